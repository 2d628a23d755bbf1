//! The bundled control page, compiled into the binary.

const INDEX_HTML: &str = include_str!("assets/index.html");
const STYLES_CSS: &str = include_str!("assets/styles.css");
const APP_JS: &str = include_str!("assets/app.js");

pub struct Asset {
    pub content_type: &'static str,
    pub body: &'static str,
}

/// Looks up a static file by request path.
pub fn lookup(path: &str) -> Option<Asset> {
    let (content_type, body) = match path {
        "" | "index.html" => ("text/html; charset=utf-8", INDEX_HTML),
        "styles.css" => ("text/css; charset=utf-8", STYLES_CSS),
        "app.js" => ("application/javascript; charset=utf-8", APP_JS),
        _ => return None,
    };
    Some(Asset { content_type, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_resolve() {
        assert!(lookup("").unwrap().body.contains("<html"));
        assert_eq!(
            lookup("app.js").unwrap().content_type,
            "application/javascript; charset=utf-8"
        );
        assert!(lookup("secrets.txt").is_none());
    }
}
