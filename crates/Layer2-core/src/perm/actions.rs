//! 권한 문자열 정규화

use nging_foundation::WILDCARD;

/// 쉼표로 나누고 공백/빈 토큰을 버린다
pub fn split_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// 저장 전에 페이지 권한 목록을 정규화한다 (BuildPermActions)
///
/// - `*`가 있으면 결과는 `*` 하나
/// - `prefix/*` 뒤에 오는, 이미 그 prefix에 포함된 값은 버린다
/// - 나머지는 순서를 유지하며 중복 제거 후 쉼표로 잇는다
pub fn build_perm_actions<S: AsRef<str>>(values: &[S]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(values.len());
    let mut prefixes: Vec<&str> = Vec::new();

    for value in values {
        let value = value.as_ref().trim().trim_start_matches('/');
        if value.is_empty() {
            continue;
        }
        if value == WILDCARD {
            return WILDCARD.to_string();
        }
        if out.contains(&value) || prefixes.iter().any(|p| value.starts_with(p)) {
            continue;
        }
        if let Some(prefix) = value.strip_suffix(WILDCARD) {
            if prefix.ends_with('/') {
                prefixes.push(prefix);
            }
        }
        out.push(value);
    }

    out.join(",")
}

/// 순서를 유지한 중복 제거 (command 종류)
pub fn dedupe_join<S: AsRef<str>>(values: &[S]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.as_ref().trim();
        if value.is_empty() || out.contains(&value) {
            continue;
        }
        if value == WILDCARD {
            return WILDCARD.to_string();
        }
        out.push(value);
    }
    out.join(",")
}
