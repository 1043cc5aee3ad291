use regex::Regex;

use crate::errors::{CoreError, CoreResult};

/// Rejects values longer than `max` characters.
pub fn max_chars(field: &str, value: &str, max: usize) -> CoreResult<()> {
    if value.chars().count() > max {
        return Err(CoreError::invalid_field(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

pub fn optional_max_chars(field: &str, value: Option<&str>, max: usize) -> CoreResult<()> {
    match value {
        Some(value) => max_chars(field, value, max),
        None => Ok(()),
    }
}

/// Rejects empty or whitespace-only values.
pub fn not_blank(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::invalid_field(field, "must not be blank"));
    }
    Ok(())
}

/// Rejects values containing anything but ASCII digits.
pub fn digits_only(field: &str, value: &str) -> CoreResult<()> {
    let regex = Regex::new(r"^[0-9]*$")
        .map_err(|e| CoreError::internal(format!("Failed to compile digits regex: {}", e)))?;
    if !regex.is_match(value) {
        return Err(CoreError::invalid_field(field, "must contain digits only"));
    }
    Ok(())
}

/// Removes duplicates while keeping first-seen order.
pub fn dedup_ids(ids: Vec<i32>) -> Vec<i32> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_counted_in_characters() {
        assert!(max_chars("title", "数学数学", 4).is_ok());
        let err = max_chars("title", "数学数学数", 4).unwrap_err();
        assert_eq!(
            err.fields().and_then(|f| f.get("field")).map(String::as_str),
            Some("title")
        );
    }

    #[test]
    fn blank_values_are_rejected() {
        assert!(not_blank("profile_name", "  ").is_err());
        assert!(not_blank("profile_name", "hanako").is_ok());
    }

    #[test]
    fn telephone_numbers_are_digits() {
        assert!(digits_only("telephoneNumber", "09012345678").is_ok());
        assert!(digits_only("telephoneNumber", "").is_ok());
        assert!(digits_only("telephoneNumber", "090-1234").is_err());
        assert!(digits_only("telephoneNumber", "０９０").is_err());
    }

    #[test]
    fn dedup_keeps_order() {
        assert_eq!(dedup_ids(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
