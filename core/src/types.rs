use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SlugError;

/// Application routes reachable from the search surface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Landing page
    Home,
    /// Starred repositories of a GitHub user
    User { login: String },
    /// Detail view of one starred repository
    Star { login: String, slug: RepositorySlug },
}

impl Route {
    /// Route for a user's starred repositories
    pub fn user(login: impl Into<String>) -> Self {
        Route::User { login: login.into() }
    }

    /// Route for a single starred repository of a user
    pub fn star(login: impl Into<String>, slug: RepositorySlug) -> Self {
        Route::Star {
            login: login.into(),
            slug,
        }
    }

    /// Render the route as a URL path with every dynamic segment percent-encoded
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::User { login } => format!("/users/{}", encode_segment(login)),
            Route::Star { login, slug } => format!(
                "/users/{}/stars/{}",
                encode_segment(login),
                encode_segment(&slug.to_slug())
            ),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Percent-encode a single path segment (`user@domain.com` -> `user%40domain.com`)
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Repository identity as used in URLs.
///
/// GitHub names a repository `owner/name`; URLs carry it as `owner-name`.
/// Parsing takes everything before the first `-` as the owner, so owners
/// that themselves contain `-` do not round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositorySlug {
    pub owner: String,
    pub name: String,
}

impl RepositorySlug {
    /// Build from GitHub's `nameWithOwner` form (`facebook/react`)
    pub fn from_name_with_owner(name_with_owner: &str) -> Result<Self, SlugError> {
        let (owner, name) = name_with_owner
            .split_once('/')
            .ok_or_else(|| SlugError::InvalidNameWithOwner {
                value: name_with_owner.to_string(),
            })?;

        if owner.is_empty() || name.is_empty() {
            return Err(SlugError::InvalidNameWithOwner {
                value: name_with_owner.to_string(),
            });
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse a URL slug (`babel-babel-preset-env`) back into owner and name
    pub fn parse(slug: &str) -> Result<Self, SlugError> {
        if slug.is_empty() {
            return Err(SlugError::Empty);
        }

        let (owner, name) = slug
            .split_once('-')
            .ok_or_else(|| SlugError::MissingSeparator {
                slug: slug.to_string(),
            })?;

        if owner.is_empty() || name.is_empty() {
            return Err(SlugError::EmptyPart {
                slug: slug.to_string(),
            });
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// URL form: `owner-name`, with any `/` left in the name flattened to `-`
    pub fn to_slug(&self) -> String {
        format!("{}-{}", self.owner, self.name).replace('/', "-")
    }

    /// GitHub form: `owner/name`
    pub fn name_with_owner(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_route_path() {
        assert_eq!(Route::Home.path(), "/");
    }

    #[test]
    fn test_user_route_encodes_login() {
        assert_eq!(Route::user("octocat").path(), "/users/octocat");
        assert_eq!(
            Route::user("user@domain.com").path(),
            "/users/user%40domain.com"
        );
        assert_eq!(Route::user("a b/c").path(), "/users/a%20b%2Fc");
    }

    #[test]
    fn test_star_route_path() {
        let slug = RepositorySlug::from_name_with_owner("facebook/react").unwrap();
        let route = Route::star("octocat", slug);
        assert_eq!(route.to_string(), "/users/octocat/stars/facebook-react");
    }

    #[test]
    fn test_slug_from_name_with_owner() {
        let slug = RepositorySlug::from_name_with_owner("babel/babel-preset-env").unwrap();
        assert_eq!(slug.owner, "babel");
        assert_eq!(slug.name, "babel-preset-env");
        assert_eq!(slug.to_slug(), "babel-babel-preset-env");
        assert_eq!(slug.name_with_owner(), "babel/babel-preset-env");
    }

    #[test]
    fn test_slug_from_name_with_owner_rejects_missing_slash() {
        let err = RepositorySlug::from_name_with_owner("react").unwrap_err();
        assert!(matches!(err, SlugError::InvalidNameWithOwner { .. }));
    }

    #[test]
    fn test_parse_slug_keeps_hyphenated_names() {
        let slug = RepositorySlug::parse("babel-babel-preset-env").unwrap();
        assert_eq!(slug.owner, "babel");
        assert_eq!(slug.name, "babel-preset-env");
    }

    #[test]
    fn test_parse_slug_errors() {
        assert!(matches!(RepositorySlug::parse(""), Err(SlugError::Empty)));
        assert!(matches!(
            RepositorySlug::parse("react"),
            Err(SlugError::MissingSeparator { .. })
        ));
        assert!(matches!(
            RepositorySlug::parse("-react"),
            Err(SlugError::EmptyPart { .. })
        ));
        assert!(matches!(
            RepositorySlug::parse("facebook-"),
            Err(SlugError::EmptyPart { .. })
        ));
    }
}
