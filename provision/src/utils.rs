use regex::Regex;

use archive::Dataset;

pub fn sanitize_dataset(dataset: &mut Dataset) {
    for faculty in &mut dataset.faculties {
        faculty.name = sanitize(&faculty.name);
    }
    for department in &mut dataset.departments {
        department.name = sanitize(&department.name);
    }
    for subject in &mut dataset.subjects {
        subject.name = sanitize(&subject.name);
    }
    for professor in &mut dataset.professors {
        professor.name = sanitize(&professor.name);
    }
}

/// Names come from hand-edited files. Strip control characters, turn
/// full-width spaces into plain ones, trim, collapse runs of spaces.
/// Japanese text itself passes through untouched.
pub fn sanitize(input: &str) -> String {
    let control = Regex::new(r"[\x00-\x1F\x7F]").unwrap();
    let mut s = control.replace_all(input, "").into_owned();

    let fullwidth = Regex::new(r"\u{3000}").unwrap();
    s = fullwidth.replace_all(&s, " ").into_owned();

    let collapse = Regex::new(r" +").unwrap();
    collapse.replace_all(s.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::sanitize;

    #[test]
    fn test_basic() {
        assert_eq!(sanitize("回路理論"), "回路理論");
        assert_eq!(sanitize("佐藤 健一"), "佐藤 健一");
    }

    #[test]
    fn test_fullwidth_space() {
        assert_eq!(sanitize("佐藤　健一"), "佐藤 健一");
        assert_eq!(sanitize("　高橋　　誠　"), "高橋 誠");
    }

    #[test]
    fn test_leading_trailing_spaces() {
        assert_eq!(sanitize("   工学部   "), "工学部");
        assert_eq!(sanitize("  UX  コース  "), "UX コース");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(sanitize("熱力学\n"), "熱力学");
        assert_eq!(sanitize("材料\t力学"), "材料力学");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("     "), "");
    }
}
