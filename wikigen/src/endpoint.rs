use url::Url;

use crate::settings::DEFAULT_API_URL;

const CHAT_COMPLETIONS_SUFFIX: &str = "/chat/completions";
const OPENAI_HOST: &str = "api.openai.com";

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Turn a user supplied endpoint into the base url the chat completion route
/// is appended to. Never fails: anything unusable resolves to the default.
pub fn resolve_base_url(api_url: Option<&str>) -> String {
    let Some(sanitized) = api_url.map(str::trim).filter(|url| !url.is_empty()) else {
        return default_base_url();
    };

    let sanitized = strip_suffix_ignore_ascii_case(sanitized, CHAT_COMPLETIONS_SUFFIX)
        .or_else(|| {
            sanitized
                .strip_suffix('/')
                .and_then(|s| strip_suffix_ignore_ascii_case(s, CHAT_COMPLETIONS_SUFFIX))
        })
        .unwrap_or(sanitized)
        .trim_end_matches('/');
    if sanitized.is_empty() {
        return default_base_url();
    }

    let mut url = match Url::parse(sanitized) {
        Ok(url) => url,
        Err(err) => {
            tracing::warn!(error = %err, "Invalid API URL provided, falling back to default");
            return default_base_url();
        }
    };

    let path = url.path().trim_end_matches('/').to_string();
    let is_openai_host = url
        .host_str()
        .is_some_and(|host| ends_with_ignore_ascii_case(host, OPENAI_HOST));

    if is_openai_host && !has_version_segment(&path) {
        url.set_path(&format!("{path}/v1"));
    } else {
        url.set_path(&path);
    }
    url.into()
}

fn strip_suffix_ignore_ascii_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    if !s.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = s.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

fn ends_with_ignore_ascii_case(s: &str, suffix: &str) -> bool {
    strip_suffix_ignore_ascii_case(s, suffix).is_some()
}

/// `/v1`, `/v2`, ... as the last path segment.
fn has_version_segment(path: &str) -> bool {
    let Some((_, last)) = path.rsplit_once('/') else {
        return false;
    };
    let mut chars = last.chars();
    matches!(chars.next(), Some('v' | 'V'))
        && !chars.as_str().is_empty()
        && chars.all(|c| c.is_ascii_digit())
}
