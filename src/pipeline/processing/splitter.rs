//! Recovers the boundary between a contributor's name and address when the
//! lookup page renders them as one run-together string such as
//! `"KAUR, AASEESDUNWOODY, GA 30360"`.

/// First and last name tokens taken from the name that was queried.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryNameParts {
    pub first: String,
    pub last: String,
}

impl QueryNameParts {
    /// Accepts `"LAST, FIRST ..."` or `"FIRST ... LAST"`.
    pub fn parse(query_name: &str) -> Self {
        if query_name.contains(',') {
            let mut parts = query_name.split(',');
            let last = parts.next().unwrap_or_default().trim().to_string();
            let first = parts
                .next()
                .and_then(|rest| rest.split_whitespace().next())
                .unwrap_or_default()
                .to_string();
            return Self { first, last };
        }

        let tokens: Vec<&str> = query_name.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Self::default(),
            [only] => Self {
                first: only.to_string(),
                last: String::new(),
            },
            [first, .., last] => Self {
                first: first.to_string(),
                last: last.to_string(),
            },
        }
    }
}

/// Splits `blob` into `(name_part, address_part)` using the tokens of `query_name`.
///
/// Matching is case-insensitive; slicing happens on the original text. When
/// neither token can be found the whole blob is returned as the name.
pub fn split_name_address(blob: &str, query_name: &str) -> (String, String) {
    let QueryNameParts { first, last } = QueryNameParts::parse(query_name);

    let first_match = find_ci(blob, &first);
    let last_match = || rfind_ci(blob, &last);

    if let Some((first_start, first_end)) = first_match {
        let prefix = blob[..first_start].trim();
        if !last.is_empty() && prefix.to_uppercase().starts_with(&format!("{},", last.to_uppercase())) {
            return split_at(blob, first_end);
        }

        if let Some((_, last_end)) = last_match() {
            return split_at(blob, last_end);
        }

        return split_at(blob, first_end);
    }

    if let Some((_, last_end)) = last_match() {
        return split_at(blob, last_end);
    }

    (blob.to_string(), String::new())
}

fn split_at(blob: &str, boundary: usize) -> (String, String) {
    let (name, address) = blob.split_at(boundary);
    (name.trim().to_string(), address.trim().to_string())
}

/// Byte range of the first case-insensitive occurrence of `needle`.
fn find_ci(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .char_indices()
        .find_map(|(start, _)| match_at(haystack, start, needle).map(|end| (start, end)))
}

/// Byte range of the last case-insensitive occurrence of `needle`.
fn rfind_ci(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .char_indices()
        .rev()
        .find_map(|(start, _)| match_at(haystack, start, needle).map(|end| (start, end)))
}

/// If `needle` matches `haystack` at byte offset `start`, returns the end offset.
fn match_at(haystack: &str, start: usize, needle: &str) -> Option<usize> {
    let mut rest = haystack[start..].char_indices();
    let mut end = start;
    for expected in needle.chars() {
        let (offset, actual) = rest.next()?;
        if !actual.to_uppercase().eq(expected.to_uppercase()) {
            return None;
        }
        end = start + offset + actual.len_utf8();
    }
    Some(end)
}
