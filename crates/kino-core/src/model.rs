//! Domain entities produced by the mapper.

use chrono::{Datelike, NaiveDate};

/// Placeholder used when the catalog leaves a text field empty.
pub const NO_INFO_AVAILABLE: &str = "No information available";

/// A movie genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    /// TMDB genre ID.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Genre {
    /// Creates a genre.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A movie, either from a list response or a detail response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: String,
    /// Title; never blank.
    pub title: String,
    /// Absolute poster URL.
    pub poster_url: String,
    /// Absolute backdrop URL.
    pub backdrop_url: String,
    /// Overview text.
    pub overview: String,
    /// Associated genre IDs.
    pub genre_ids: Vec<String>,
    /// Rating as a percentage (0-100).
    pub rating: Option<u8>,
    /// Release date.
    pub release_date: Option<NaiveDate>,
    /// Runtime in minutes (detail responses only).
    pub runtime_minutes: Option<u32>,
}

impl Movie {
    /// Release year, when the release date is known.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.release_date.map(|date| date.year())
    }
}

/// What a person is mainly credited for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Department {
    /// Cast member.
    Acting,
    /// Producer or other production crew.
    Production,
    /// Anything else, or not reported.
    Unknown,
}

impl Department {
    /// Classifies a TMDB `known_for_department` value.
    #[must_use]
    pub fn from_known_for(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("Acting") => Self::Acting,
            Some(v) if v.eq_ignore_ascii_case("Production") => Self::Production,
            _ => Self::Unknown,
        }
    }
}

/// An actor, producer, or person search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct People {
    /// TMDB person ID.
    pub id: String,
    /// Name.
    pub name: String,
    /// Absolute profile picture URL.
    pub profile_pic_url: String,
    /// Department classification.
    pub department: Department,
    /// Movies the person is known for (person search only).
    pub known_for: Option<Vec<Movie>>,
}

impl People {
    /// Stand-in used when a movie has no credited producer.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            id: String::from(NO_INFO_AVAILABLE),
            name: String::from(NO_INFO_AVAILABLE),
            profile_pic_url: String::from(NO_INFO_AVAILABLE),
            department: Department::Unknown,
            known_for: None,
        }
    }
}

/// An actor paired with the role played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    /// The actor.
    pub actor: People,
    /// Character name.
    pub character: String,
}

/// Cast and producer of one movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieCredits {
    /// TMDB movie ID.
    pub movie_id: String,
    /// Acting cast in billing order.
    pub characters: Vec<Character>,
    /// First credited producer, or [`People::unknown`].
    pub producer: People,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_from_release_date() {
        // Arrange
        let movie = Movie {
            id: String::from("436969"),
            title: String::from("The Suicide Squad"),
            poster_url: String::from(NO_INFO_AVAILABLE),
            backdrop_url: String::from(NO_INFO_AVAILABLE),
            overview: String::from(NO_INFO_AVAILABLE),
            genre_ids: Vec::new(),
            rating: None,
            release_date: NaiveDate::from_ymd_opt(2021, 7, 28),
            runtime_minutes: None,
        };

        // Act & Assert
        assert_eq!(movie.year(), Some(2021));
        assert_eq!(
            Movie {
                release_date: None,
                ..movie
            }
            .year(),
            None
        );
    }

    #[test]
    fn test_department_from_known_for() {
        assert_eq!(Department::from_known_for(Some("Acting")), Department::Acting);
        assert_eq!(Department::from_known_for(Some("acting")), Department::Acting);
        assert_eq!(
            Department::from_known_for(Some("Production")),
            Department::Production
        );
        assert_eq!(Department::from_known_for(Some("Sound")), Department::Unknown);
        assert_eq!(Department::from_known_for(None), Department::Unknown);
    }

    #[test]
    fn test_unknown_people_placeholder() {
        // Arrange & Act
        let people = People::unknown();

        // Assert
        assert_eq!(people.department, Department::Unknown);
        assert_eq!(people.name, NO_INFO_AVAILABLE);
        assert!(people.known_for.is_none());
    }
}
