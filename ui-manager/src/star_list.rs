//! Starred repository grid
//!
//! Maps a user's starred-repositories response into cards, a header count
//! and cursor pagination.

use serde::{Deserialize, Serialize};
use telescope_core::{RepositorySlug, Route, SlugError};
use tracing::debug;

/// Card titles longer than this are cut and suffixed with `...`
pub const MAX_CARD_NAME_CHARS: usize = 12;

/// Breadcrumb root label
pub const HOME_LABEL: &str = "Telescope";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    #[serde(default)]
    pub start_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// The repository fields a card shows; anything else in the payload is ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarredRepository {
    pub name: String,
    pub name_with_owner: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub stargazer_count: u64,
    #[serde(default)]
    pub fork_count: u64,
    #[serde(default)]
    pub primary_language: Option<Language>,
    #[serde(default)]
    pub pushed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarredRepositoryEdge {
    #[serde(default)]
    pub starred_at: Option<String>,
    pub node: StarredRepository,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarredRepositoryConnection {
    pub total_count: u64,
    #[serde(default)]
    pub edges: Vec<StarredRepositoryEdge>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithStars {
    pub starred_repositories: StarredRepositoryConnection,
}

/// Response body of the starred repositories query; `user` is null for
/// unknown logins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStarredRepositoriesResponse {
    pub user: Option<UserWithStars>,
}

/// One tile in the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StarCard {
    /// Display name, possibly shortened
    pub name: String,
    pub full_name: String,
    pub initials: String,
    pub slug: RepositorySlug,
    pub route: Route,
    pub href: String,
    pub description: Option<String>,
    /// Primary language, `"Unknown"` when GitHub has none
    pub language: String,
    pub stargazer_count: u64,
    pub fork_count: u64,
}

impl StarCard {
    /// Build the card for `edge` as starred by `login`
    pub fn from_edge(login: &str, edge: &StarredRepositoryEdge) -> Result<Self, SlugError> {
        let node = &edge.node;
        let slug = RepositorySlug::from_name_with_owner(&node.name_with_owner)?;
        let route = Route::star(login, slug.clone());

        Ok(Self {
            name: display_name(&node.name),
            full_name: node.name.clone(),
            initials: initials(&node.name),
            href: route.path(),
            slug,
            route,
            description: node.description.clone(),
            language: node
                .primary_language
                .as_ref()
                .map_or_else(|| "Unknown".to_string(), |l| l.name.clone()),
            stargazer_count: node.stargazer_count,
            fork_count: node.fork_count,
        })
    }
}

/// Shorten `name` to [`MAX_CARD_NAME_CHARS`] characters
pub fn display_name(name: &str) -> String {
    if name.chars().count() > MAX_CARD_NAME_CHARS {
        let head: String = name.chars().take(MAX_CARD_NAME_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// First letter of every `-` or `_` separated word, upper-cased
pub fn initials(name: &str) -> String {
    name.split(['-', '_'])
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Cursors for the neighbouring pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub next_cursor: Option<String>,
    pub previous_cursor: Option<String>,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous_cursor.is_some()
    }

    /// Whether any navigation control is shown
    pub fn is_visible(&self) -> bool {
        self.has_next() || self.has_previous()
    }
}

impl From<&PageInfo> for Pagination {
    fn from(info: &PageInfo) -> Self {
        Self {
            next_cursor: info.end_cursor.clone().filter(|_| info.has_next_page),
            previous_cursor: info.start_cursor.clone().filter(|_| info.has_previous_page),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub name: String,
    /// `None` for the current page
    pub route: Option<Route>,
}

/// What the stars page shows for one login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StarList {
    UserNotFound {
        login: String,
    },
    Loaded {
        login: String,
        total_count: u64,
        cards: Vec<StarCard>,
        pagination: Pagination,
    },
}

impl StarList {
    pub fn from_response(
        login: &str,
        response: &UserStarredRepositoriesResponse,
    ) -> Result<Self, SlugError> {
        let Some(user) = &response.user else {
            debug!("No user named {}", login);
            return Ok(Self::UserNotFound {
                login: login.to_string(),
            });
        };

        let connection = &user.starred_repositories;
        let cards = connection
            .edges
            .iter()
            .map(|edge| StarCard::from_edge(login, edge))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("{} of {} starred repositories for {}", cards.len(), connection.total_count, login);

        Ok(Self::Loaded {
            login: login.to_string(),
            total_count: connection.total_count,
            cards,
            pagination: Pagination::from(&connection.page_info),
        })
    }

    pub fn login(&self) -> &str {
        match self {
            Self::UserNotFound { login } | Self::Loaded { login, .. } => login,
        }
    }

    pub fn cards(&self) -> &[StarCard] {
        match self {
            Self::UserNotFound { .. } => &[],
            Self::Loaded { cards, .. } => cards,
        }
    }

    pub fn pagination(&self) -> Pagination {
        match self {
            Self::UserNotFound { .. } => Pagination::default(),
            Self::Loaded { pagination, .. } => pagination.clone(),
        }
    }

    /// Grid heading, or the not-found title
    pub fn heading(&self) -> String {
        match self {
            Self::UserNotFound { .. } => "User not found".to_string(),
            Self::Loaded { total_count, .. } => format!("{total_count} Starred Repositories"),
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            Self::UserNotFound { login } => Some(format!("The user {login} could not be found.")),
            Self::Loaded { .. } => None,
        }
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        match self {
            Self::UserNotFound { .. } => Vec::new(),
            Self::Loaded { login, .. } => vec![
                Breadcrumb {
                    name: HOME_LABEL.to_string(),
                    route: Some(Route::Home),
                },
                Breadcrumb {
                    name: login.clone(),
                    route: None,
                },
            ],
        }
    }
}
