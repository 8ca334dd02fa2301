use std::borrow::Cow;

use crate::context::Context;

/// Query parameter GitHub accepts the access token in.
pub const TOKEN_PARAMETER: &str = "access_token";

/// Identity used when nothing path-safe survives sanitization.
const EMPTY_IDENTITY: &str = "_";

/// Path of the cache entry for `request_url`, scoped to the context's repository.
///
/// The result has the form `<cache dir>/<owner>/<name>/<identity>`, where the
/// identity is the request URL with the token removed and every path-unsafe
/// character folded into `-`. Equal inputs always yield equal paths, and URLs
/// that differ only by their token share a single entry.
pub fn cache_entry_path(ctx: &Context, request_url: &str) -> String {
    let identity = path_safe(&strip_token(request_url, &ctx.github_token));
    join(&[
        ctx.cache_directory_path.as_str(),
        &*segment(&ctx.repo_owner),
        &*segment(&ctx.repo_name),
        identity.as_str(),
    ])
}

/// Removes every trace of `token` from `request_url`.
///
/// The whole `access_token=<token>` pair goes first, then any other literal
/// occurrence, until none is left.
pub fn strip_token<'a>(request_url: &'a str, token: &str) -> Cow<'a, str> {
    if token.is_empty() || !request_url.contains(token) {
        return Cow::Borrowed(request_url);
    }

    let mut stripped = request_url.replace(&format!("{TOKEN_PARAMETER}={token}"), "");
    // Removing one occurrence can splice together a new one.
    while stripped.contains(token) {
        stripped = stripped.replace(token, "");
    }
    Cow::Owned(stripped)
}

/// Folds a request identity into a single filename-safe segment.
///
/// ASCII alphanumerics and `_` are kept. Any run of other characters becomes
/// one `-`, and leading or trailing dashes are dropped.
pub fn path_safe(identity: &str) -> String {
    let mut safe = String::with_capacity(identity.len());
    for c in identity.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            safe.push(c);
        } else if !safe.ends_with('-') {
            safe.push('-');
        }
    }

    match safe.trim_matches('-') {
        "" => EMPTY_IDENTITY.to_string(),
        trimmed => trimmed.to_string(),
    }
}

// Owner and name are single directory levels, never traversals.
fn segment(value: &str) -> Cow<'_, str> {
    match value {
        "" | "." | ".." => Cow::Borrowed(EMPTY_IDENTITY),
        v if v.contains(['/', '\\']) => Cow::Owned(v.replace(['/', '\\'], "-")),
        v => Cow::Borrowed(v),
    }
}

/// Joins non-empty elements with `/` and lexically cleans the result.
fn join(elements: &[&str]) -> String {
    let joined = elements
        .iter()
        .filter(|e| !e.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    clean(&joined)
}

fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            part => parts.push(part),
        }
    }

    let cleaned = parts.join("/");
    if rooted {
        format!("/{cleaned}")
    } else if cleaned.is_empty() {
        ".".to_string()
    } else {
        cleaned
    }
}
