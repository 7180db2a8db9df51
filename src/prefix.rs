//! Common filename prefix detection.

/// Returns the longest prefix shared by all `names`.
///
/// Fewer than two names have no meaningful common prefix, so the empty
/// string is returned for them. Only the lexicographically first and last
/// names need to be compared: every name sorted between them shares at least
/// their common prefix.
pub fn detect_common_prefix<S: AsRef<str>>(names: &[S]) -> String {
    if names.len() < 2 {
        return String::new();
    }

    let mut sorted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();

    let (first, last) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return String::new(),
    };

    let end = first
        .char_indices()
        .zip(last.chars())
        .find(|((_, a), b)| a != b)
        .map(|((idx, _), _)| idx)
        .unwrap_or(first.len());

    first[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_prefix() {
        let names = ["icon-home.svg", "icon-search.svg", "icon-help.svg"];
        assert_eq!(detect_common_prefix(&names), "icon-");
    }

    #[test]
    fn test_prefix_is_maximal() {
        let names = ["ic_home.svg", "ic_house.svg", "ic_hotel.svg"];
        assert_eq!(detect_common_prefix(&names), "ic_ho");
    }

    #[test]
    fn test_fewer_than_two_names() {
        let empty: [&str; 0] = [];
        assert_eq!(detect_common_prefix(&empty), "");
        assert_eq!(detect_common_prefix(&["a.svg"]), "");
    }

    #[test]
    fn test_no_shared_prefix() {
        assert_eq!(detect_common_prefix(&["a.svg", "b.svg"]), "");
    }

    #[test]
    fn test_one_name_is_prefix_of_another() {
        let names = vec!["arrow".to_string(), "arrow-left".to_string()];
        assert_eq!(detect_common_prefix(&names), "arrow");
    }

    #[test]
    fn test_order_does_not_matter() {
        let names = ["x-b.svg", "x-a.svg", "x-c.svg"];
        let reversed = ["x-c.svg", "x-a.svg", "x-b.svg"];
        assert_eq!(detect_common_prefix(&names), detect_common_prefix(&reversed));
    }

    #[test]
    fn test_multibyte_characters() {
        let names = ["ñandú-a.svg", "ñandú-b.svg"];
        assert_eq!(detect_common_prefix(&names), "ñandú-");
    }
}
