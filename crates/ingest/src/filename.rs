/// Make a client-supplied filename safe to log, echo back, and derive titles from.
///
/// Path separators become word breaks, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped, and leading/trailing `.`/`_` are
/// trimmed. May return an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_ordinary_names() {
        assert_eq!(sanitize_filename("lecture-3.pdf"), "lecture-3.pdf");
    }

    #[test]
    fn joins_words_with_underscores() {
        assert_eq!(sanitize_filename("My cool   movie.mov"), "My_cool_movie.mov");
    }

    #[test]
    fn strips_path_traversal() {
        assert_eq!(sanitize_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename(r"C:\Users\me\notes.txt"), "C_Users_me_notes.txt");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(sanitize_filename("résumé.docx"), "rsum.docx");
    }

    #[test]
    fn may_end_up_empty() {
        assert_eq!(sanitize_filename("../.."), "");
        assert_eq!(sanitize_filename("日本語"), "");
    }
}
