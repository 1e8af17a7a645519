//! TMDB DTO to domain mapping.
//!
//! Pure functions. Missing identifiers are errors; every other absent
//! field degrades to [`NO_INFO_AVAILABLE`], an empty list, or `None`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use kino_api::tmdb::{
    CastDto, CreditsResponse, CrewDto, GenreDto, GenresResponse, IMAGE_URL_PREFIX, MovieDto,
    MovieListItemDto, MoviesListResponse, PersonListItemDto, PersonListResponse,
};

use crate::model::{
    Character, Department, Genre, Movie, MovieCredits, NO_INFO_AVAILABLE, People,
};

fn required_id(id: Option<&String>, what: &str) -> Result<String> {
    id.cloned()
        .with_context(|| format!("{what} without id in TMDB response"))
}

fn or_sentinel(value: Option<&String>) -> String {
    value
        .cloned()
        .unwrap_or_else(|| String::from(NO_INFO_AVAILABLE))
}

fn non_blank(value: Option<&String>) -> Option<&String> {
    value.filter(|s| !s.trim().is_empty())
}

fn pick_title(title: Option<&String>, original_title: Option<&String>) -> String {
    non_blank(title)
        .or_else(|| non_blank(original_title))
        .cloned()
        .unwrap_or_else(|| String::from(NO_INFO_AVAILABLE))
}

/// Maps a genre DTO.
///
/// # Errors
///
/// Returns an error if the genre has no id.
pub fn to_genre(dto: &GenreDto) -> Result<Genre> {
    Ok(Genre {
        id: required_id(dto.id.as_ref(), "genre")?,
        name: or_sentinel(dto.name.as_ref()),
    })
}

/// Maps the genre list response.
///
/// # Errors
///
/// Returns an error if any genre has no id.
pub fn to_genre_list(response: &GenresResponse) -> Result<Vec<Genre>> {
    response.genres.iter().map(to_genre).collect()
}

/// Maps a movie detail response.
///
/// Genre ids come from the embedded genre objects.
///
/// # Errors
///
/// Returns an error if the movie or any embedded genre has no id.
pub fn to_movie(dto: &MovieDto) -> Result<Movie> {
    let id = required_id(dto.id.as_ref(), "movie")?;
    let genre_ids = dto
        .genres
        .iter()
        .flatten()
        .map(|genre| required_id(genre.id.as_ref(), "genre"))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid genres for movie {id}"))?;
    let release_date = parse_release_date(dto.release_date.as_deref(), &id);

    Ok(Movie {
        title: pick_title(dto.title.as_ref(), dto.original_title.as_ref()),
        poster_url: image_url(dto.poster_path.as_deref()),
        backdrop_url: image_url(dto.backdrop_path.as_deref()),
        overview: or_sentinel(dto.overview.as_ref()),
        genre_ids,
        rating: to_rating(dto.vote_average),
        release_date,
        runtime_minutes: dto.runtime,
        id,
    })
}

/// Maps a movie as found in list responses (no runtime).
///
/// # Errors
///
/// Returns an error if the movie has no id.
pub fn to_movie_from_list_item(dto: &MovieListItemDto) -> Result<Movie> {
    let id = required_id(dto.id.as_ref(), "movie")?;
    let release_date = parse_release_date(dto.release_date.as_deref(), &id);

    Ok(Movie {
        title: pick_title(dto.title.as_ref(), dto.original_title.as_ref()),
        poster_url: image_url(dto.poster_path.as_deref()),
        backdrop_url: image_url(dto.backdrop_path.as_deref()),
        overview: or_sentinel(dto.overview.as_ref()),
        genre_ids: dto.genre_ids.clone().unwrap_or_default(),
        rating: to_rating(dto.vote_average),
        release_date,
        runtime_minutes: None,
        id,
    })
}

/// Maps a paged movie list, keeping response order.
///
/// # Errors
///
/// Returns an error if any movie has no id.
pub fn to_movies_list(response: &MoviesListResponse) -> Result<Vec<Movie>> {
    response
        .results
        .iter()
        .map(to_movie_from_list_item)
        .collect()
}

/// Maps a credits response.
///
/// Only cast entries whose department is acting are kept. The producer is
/// the first crew entry with job "Producer", or [`People::unknown`].
///
/// # Errors
///
/// Returns an error if the response or a kept entry has no id.
pub fn to_movie_credits(response: &CreditsResponse) -> Result<MovieCredits> {
    let movie_id = required_id(response.movie_id.as_ref(), "credits")?;
    let characters = response
        .cast
        .iter()
        .filter(|cast| {
            cast.known_for_department
                .as_deref()
                .is_some_and(|dept| dept.eq_ignore_ascii_case("Acting"))
        })
        .map(to_character)
        .collect::<Result<Vec<_>>>()?;
    let producer = response
        .crew
        .iter()
        .find(|crew| {
            crew.job
                .as_deref()
                .is_some_and(|job| job.eq_ignore_ascii_case("Producer"))
        })
        .map_or_else(|| Ok(People::unknown()), to_producer)?;

    Ok(MovieCredits {
        movie_id,
        characters,
        producer,
    })
}

/// Maps a cast entry to an actor and the role played.
///
/// # Errors
///
/// Returns an error if the cast entry has no id.
pub fn to_character(dto: &CastDto) -> Result<Character> {
    Ok(Character {
        actor: People {
            id: required_id(dto.id.as_ref(), "cast member")?,
            name: or_sentinel(dto.name.as_ref()),
            profile_pic_url: image_url(dto.profile_path.as_deref()),
            department: Department::Acting,
            known_for: None,
        },
        character: or_sentinel(dto.character.as_ref()),
    })
}

/// Maps a crew entry to a producer.
///
/// # Errors
///
/// Returns an error if the crew entry has no id.
pub fn to_producer(dto: &CrewDto) -> Result<People> {
    Ok(People {
        id: required_id(dto.id.as_ref(), "crew member")?,
        name: or_sentinel(dto.name.as_ref()),
        profile_pic_url: image_url(dto.profile_path.as_deref()),
        department: Department::Production,
        known_for: None,
    })
}

/// Maps a person search hit, including the movies they are known for.
///
/// # Errors
///
/// Returns an error if the person or any known-for movie has no id.
pub fn to_people(dto: &PersonListItemDto) -> Result<People> {
    let known_for = dto
        .known_for
        .as_ref()
        .map(|movies| {
            movies
                .iter()
                .map(to_movie_from_list_item)
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?;

    Ok(People {
        id: required_id(dto.id.as_ref(), "person")?,
        name: or_sentinel(dto.name.as_ref()),
        profile_pic_url: image_url(dto.profile_path.as_deref()),
        department: Department::from_known_for(dto.known_for_department.as_deref()),
        known_for,
    })
}

/// Maps a person search response, keeping response order.
///
/// # Errors
///
/// Returns an error if any person has no id.
pub fn to_people_list(response: &PersonListResponse) -> Result<Vec<People>> {
    response.results.iter().map(to_people).collect()
}

/// Returns `true` for exactly ten characters shaped `DDDD-DD-DD`.
fn is_iso_date_shape(raw: &str) -> bool {
    raw.len() == 10
        && raw.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        })
}

/// Parses a strict `YYYY-MM-DD` release date.
///
/// Missing and empty strings are `None`. Anything else that is not a
/// zero-padded calendar date (surrounding whitespace, signs, unpadded
/// fields) is also `None` and logs a warning naming the movie.
#[must_use]
pub fn parse_release_date(raw: Option<&str>, movie_id: &str) -> Option<NaiveDate> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    let parsed = if is_iso_date_shape(raw) {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| e.to_string())
    } else {
        Err(String::from("expected YYYY-MM-DD"))
    };
    match parsed {
        Ok(date) => Some(date),
        Err(error) => {
            tracing::warn!(movie_id, release_date = raw, %error, "invalid release date");
            None
        }
    }
}

/// Builds an absolute image URL from a TMDB image path.
#[must_use]
pub fn image_url(path: Option<&str>) -> String {
    path.map_or_else(
        || String::from(NO_INFO_AVAILABLE),
        |p| format!("{IMAGE_URL_PREFIX}{p}"),
    )
}

/// Converts a 0-10 vote average into a truncated 0-100 percentage.
#[must_use]
#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn to_rating(vote_average: Option<f64>) -> Option<u8> {
    vote_average
        .filter(|avg| avg.is_finite())
        .map(|avg| (avg * 10.0).trunc().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    fn fixture(name: &str) -> String {
        let path = format!("{}/../../fixtures/tmdb/{name}", env!("CARGO_MANIFEST_DIR"));
        std::fs::read_to_string(path).unwrap()
    }

    fn list_item(id: &str) -> MovieListItemDto {
        MovieListItemDto {
            id: Some(String::from(id)),
            ..MovieListItemDto::default()
        }
    }

    #[test]
    fn test_to_genre_keeps_id_and_defaults_name() {
        // Arrange
        let named = GenreDto {
            id: Some(String::from("28")),
            name: Some(String::from("Acción")),
        };
        let unnamed = GenreDto {
            id: Some(String::from("99")),
            name: None,
        };

        // Act & Assert
        assert_eq!(to_genre(&named).unwrap(), Genre::new("28", "Acción"));
        assert_eq!(to_genre(&unnamed).unwrap(), Genre::new("99", NO_INFO_AVAILABLE));
    }

    #[test]
    fn test_to_genre_without_id_fails() {
        // Arrange
        let dto = GenreDto {
            id: None,
            name: Some(String::from("Drama")),
        };

        // Act
        let result = to_genre(&dto);

        // Assert
        assert!(result.unwrap_err().to_string().contains("genre without id"));
    }

    #[test]
    fn test_to_genre_list_from_fixture() {
        // Arrange
        let response: GenresResponse = serde_json::from_str(&fixture("genres.json")).unwrap();

        // Act
        let genres = to_genre_list(&response).unwrap();

        // Assert
        assert_eq!(genres.len(), 4);
        assert_eq!(genres[0], Genre::new("28", "Acción"));
    }

    #[test]
    fn test_title_falls_back_to_original_then_sentinel() {
        // Arrange
        let no_title = MovieListItemDto {
            original_title: Some(String::from("Original")),
            ..list_item("1")
        };
        let blank_title = MovieListItemDto {
            title: Some(String::from(" ")),
            original_title: Some(String::from("Original")),
            ..list_item("2")
        };
        let nothing = MovieListItemDto {
            title: Some(String::new()),
            original_title: Some(String::from("  ")),
            ..list_item("3")
        };

        // Act & Assert
        assert_eq!(to_movie_from_list_item(&no_title).unwrap().title, "Original");
        assert_eq!(to_movie_from_list_item(&blank_title).unwrap().title, "Original");
        assert_eq!(to_movie_from_list_item(&nothing).unwrap().title, NO_INFO_AVAILABLE);
    }

    #[test]
    fn test_list_item_defaults() {
        // Arrange
        let dto = list_item("829197");

        // Act
        let movie = to_movie_from_list_item(&dto).unwrap();

        // Assert
        assert_eq!(movie.id, "829197");
        assert!(movie.genre_ids.is_empty());
        assert_eq!(movie.poster_url, NO_INFO_AVAILABLE);
        assert_eq!(movie.backdrop_url, NO_INFO_AVAILABLE);
        assert_eq!(movie.overview, NO_INFO_AVAILABLE);
        assert_eq!(movie.rating, None);
        assert_eq!(movie.release_date, None);
        assert_eq!(movie.runtime_minutes, None);
    }

    #[test]
    fn test_movie_without_id_fails() {
        // Arrange
        let dto = MovieDto::default();

        // Act
        let result = to_movie(&dto);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_to_movie_with_genre_without_id_fails() {
        // Arrange
        let dto = MovieDto {
            id: Some(String::from("1")),
            genres: Some(vec![GenreDto {
                id: None,
                name: Some(String::from("Drama")),
            }]),
            ..MovieDto::default()
        };

        // Act
        let result = to_movie(&dto);

        // Assert
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("genre without id"), "{err:#}");
    }

    #[test]
    fn test_to_movie_without_genres_has_empty_genre_ids() {
        // Arrange
        let dto = MovieDto {
            id: Some(String::from("1")),
            genres: None,
            ..MovieDto::default()
        };

        // Act
        let movie = to_movie(&dto).unwrap();

        // Assert
        assert!(movie.genre_ids.is_empty());
    }

    #[test]
    fn test_to_movie_from_fixture() {
        // Arrange
        let dto: MovieDto = serde_json::from_str(&fixture("movie_436969.json")).unwrap();

        // Act
        let movie = to_movie(&dto).unwrap();

        // Assert
        assert_eq!(movie.id, "436969");
        assert_eq!(movie.title, "The Suicide Squad");
        assert_eq!(movie.genre_ids, vec!["28", "12", "35"]);
        assert_eq!(movie.rating, Some(78));
        assert_eq!(movie.runtime_minutes, Some(132));
        assert_eq!(movie.year(), Some(2021));
        assert!(movie.poster_url.starts_with(IMAGE_URL_PREFIX));
    }

    #[test]
    fn test_to_movies_list_from_fixture() {
        // Arrange
        let response: MoviesListResponse =
            serde_json::from_str(&fixture("discover_genre_28.json")).unwrap();

        // Act
        let movies = to_movies_list(&response).unwrap();

        // Assert
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "El Escuadrón Suicida");
        assert_eq!(movies[1].title, "Sin título");
        assert_eq!(movies[1].release_date, None);
        assert_eq!(movies[1].rating, None);
    }

    #[test]
    fn test_image_url_is_absolute() {
        // Arrange
        let path = "/kb4s0ML0iVZlG6wAKbbs9NAm6X.jpg";

        // Act
        let url = image_url(Some(path));

        // Assert
        assert_eq!(url, format!("{IMAGE_URL_PREFIX}{path}"));
        let parsed = url::Url::parse(&url).unwrap();
        assert_eq!(parsed.scheme(), "https");
        assert_eq!(parsed.host_str(), Some("image.tmdb.org"));
        assert_eq!(image_url(None), NO_INFO_AVAILABLE);
    }

    #[test]
    fn test_to_rating_truncates_and_clamps() {
        assert_eq!(to_rating(Some(7.89)), Some(78));
        assert_eq!(to_rating(Some(0.0)), Some(0));
        assert_eq!(to_rating(Some(10.0)), Some(100));
        assert_eq!(to_rating(Some(12.5)), Some(100));
        assert_eq!(to_rating(Some(-1.0)), Some(0));
        assert_eq!(to_rating(Some(f64::NAN)), None);
        assert_eq!(to_rating(None), None);
    }

    #[test]
    fn test_parse_release_date_valid() {
        assert_eq!(
            parse_release_date(Some("2021-07-28"), "436969"),
            NaiveDate::from_ymd_opt(2021, 7, 28)
        );
    }

    #[test]
    fn test_parse_release_date_rejects_loose_forms() {
        // Arrange
        let inputs = ["2021-7-8", " 2021-07-28 ", "+2021-07-28", "2021/07/28", "2021-02-30"];
        let mut mock = subscriber::mock();
        for _ in inputs {
            mock = mock.event(expect::event().at_level(tracing::Level::WARN));
        }
        let (subscriber, handle) = mock.only().run_with_handle();

        // Act
        let parsed: Vec<Option<NaiveDate>> = with_default(subscriber, || {
            inputs
                .into_iter()
                .map(|raw| parse_release_date(Some(raw), "436969"))
                .collect()
        });

        // Assert
        assert!(parsed.iter().all(Option::is_none), "{parsed:?}");
        handle.assert_finished();
    }

    #[test]
    fn test_parse_release_date_empty_is_silent() {
        // Arrange
        let (subscriber, handle) = subscriber::mock().only().run_with_handle();

        // Act
        let parsed = with_default(subscriber, || {
            (
                parse_release_date(Some(""), "1"),
                parse_release_date(None, "1"),
            )
        });

        // Assert
        assert_eq!(parsed, (None, None));
        handle.assert_finished();
    }

    #[test]
    fn test_parse_release_date_malformed_warns() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event()
                    .at_level(tracing::Level::WARN)
                    .with_fields(expect::field("movie_id").with_value(&"829197")),
            )
            .only()
            .run_with_handle();

        // Act
        let parsed = with_default(subscriber, || parse_release_date(Some("12-"), "829197"));

        // Assert
        assert_eq!(parsed, None);
        handle.assert_finished();
    }

    #[test]
    fn test_to_movie_credits_from_fixture() {
        // Arrange
        let response: CreditsResponse =
            serde_json::from_str(&fixture("credits_436969.json")).unwrap();

        // Act
        let credits = to_movie_credits(&response).unwrap();

        // Assert
        assert_eq!(credits.movie_id, "436969");
        let names: Vec<&str> = credits
            .characters
            .iter()
            .map(|c| c.actor.name.as_str())
            .collect();
        assert_eq!(names, vec!["Margot Robbie", "Idris Elba"]);
        assert_eq!(credits.characters[0].actor.id, "234352");
        assert_eq!(credits.producer.name, "Peter Safran");
        assert_eq!(credits.producer.department, Department::Production);
    }

    #[test]
    fn test_to_movie_credits_without_producer() {
        // Arrange
        let response = CreditsResponse {
            movie_id: Some(String::from("1")),
            cast: Vec::new(),
            crew: vec![CrewDto {
                id: Some(String::from("9")),
                job: Some(String::from("Director")),
                ..CrewDto::default()
            }],
        };

        // Act
        let credits = to_movie_credits(&response).unwrap();

        // Assert
        assert!(credits.characters.is_empty());
        assert_eq!(credits.producer, People::unknown());
    }

    #[test]
    fn test_producer_job_match_is_case_insensitive() {
        // Arrange
        let response = CreditsResponse {
            movie_id: Some(String::from("1")),
            cast: Vec::new(),
            crew: vec![CrewDto {
                id: Some(String::from("282")),
                name: Some(String::from("Charles Roven")),
                job: Some(String::from("producer")),
                ..CrewDto::default()
            }],
        };

        // Act
        let credits = to_movie_credits(&response).unwrap();

        // Assert
        assert_eq!(credits.producer.id, "282");
        assert_eq!(credits.producer.profile_pic_url, NO_INFO_AVAILABLE);
    }

    #[test]
    fn test_to_people_list_from_fixture() {
        // Arrange
        let response: PersonListResponse =
            serde_json::from_str(&fixture("search_person_margot.json")).unwrap();

        // Act
        let people = to_people_list(&response).unwrap();

        // Assert
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].name, "Margot Robbie");
        assert_eq!(people[0].department, Department::Acting);
        assert_eq!(people[0].known_for.as_ref().unwrap().len(), 1);
        assert_eq!(people[1].name, NO_INFO_AVAILABLE);
        assert_eq!(people[1].department, Department::Unknown);
        assert!(people[1].known_for.is_none());
    }
}
