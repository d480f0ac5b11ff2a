use alloc::string::String;

/// Shortens a type name produced by [`core::any::type_name`].
///
/// Module paths are removed from every path segment, including generic
/// arguments, and the `dyn ` marker of trait objects is dropped.
///
/// # Examples
///
/// ```
/// use tj_utils::short_type_name;
///
/// assert_eq!(short_type_name("my_app::scene::SmallNode"), "SmallNode");
/// assert_eq!(short_type_name("dyn my_app::scene::Node"), "Node");
/// assert_eq!(
///     short_type_name("alloc::vec::Vec<alloc::boxed::Box<dyn my_app::Node>>"),
///     "Vec<Box<Node>>",
/// );
/// ```
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut start = 0;

    for (index, ch) in full.char_indices() {
        if !is_delimiter(ch) {
            continue;
        }
        let segment = &full[start..index];
        start = index + ch.len_utf8();

        if segment == "dyn" && ch == ' ' {
            continue;
        }
        push_segment(&mut out, segment);
        out.push(ch);
    }

    push_segment(&mut out, &full[start..]);
    out
}

#[inline]
fn is_delimiter(ch: char) -> bool {
    matches!(
        ch,
        '<' | '>' | ',' | '(' | ')' | '[' | ']' | '&' | ';' | ' ' | '*' | '+'
    )
}

#[inline]
fn push_segment(out: &mut String, segment: &str) {
    match segment.rfind("::") {
        Some(pos) => out.push_str(&segment[pos + 2..]),
        None => out.push_str(segment),
    }
}
