//! Build manifest (Dockerfile) rendering
//!
//! The manifest is a fixed template with a single `{{ .BaseImage }}`
//! placeholder. Templates are parsed into segments first so malformed syntax is
//! reported instead of being copied into the output.

use crate::error::{Result, template_render};

/// File name of the manifest at the build-context root
pub const MANIFEST_FILE: &str = "Dockerfile";

/// Port the simulator's API server listens on inside the container
pub const EXPOSED_PORT: &str = "6443/tcp";

/// Absolute path the bundle is copied to inside the image
pub const BUNDLE_MOUNT_PATH: &str = "/bundle";

const BASE_IMAGE_VAR: &str = "BaseImage";

const DOCKERFILE_TEMPLATE: &str = "FROM {{ .BaseImage }}
EXPOSE 6443/tcp
COPY bundle /bundle
";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Variable(&'a str),
}

/// Split `template` into literal text and `{{ .Name }}` placeholders
fn parse(template: &str) -> Result<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            segments.push(literal(&rest[..start])?);
        }
        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or_else(|| template_render("unclosed '{{' in template"))?;
        let inner = after_open[..end].trim();
        let name = inner
            .strip_prefix('.')
            .filter(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
            .ok_or_else(|| template_render(format!("invalid placeholder '{{{{{inner}}}}}'")))?;
        segments.push(Segment::Variable(name));
        rest = &after_open[end + 2..];
    }

    if !rest.is_empty() {
        segments.push(literal(rest)?);
    }
    Ok(segments)
}

fn literal(text: &str) -> Result<Segment<'_>> {
    if text.contains("}}") {
        return Err(template_render("unmatched '}}' in template"));
    }
    Ok(Segment::Literal(text))
}

/// Render `template`, resolving each placeholder through `lookup`
fn render_with<'v>(template: &str, lookup: impl Fn(&str) -> Option<&'v str>) -> Result<String> {
    let segments = parse(template)?;
    let mut out = String::with_capacity(template.len());
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Variable(name) => {
                let value = lookup(name)
                    .ok_or_else(|| template_render(format!("unknown variable '.{name}'")))?;
                out.push_str(value);
            }
        }
    }
    Ok(out)
}

/// Render the build manifest for `base_image`.
///
/// ```
/// let manifest = bundlesim::manifest::render_dockerfile("rancher/support-bundle-kit:master").unwrap();
/// assert!(manifest.starts_with("FROM rancher/support-bundle-kit:master\n"));
/// ```
pub fn render_dockerfile(base_image: &str) -> Result<String> {
    render_with(DOCKERFILE_TEMPLATE, |name| {
        (name == BASE_IMAGE_VAR).then_some(base_image)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::archive::BUNDLE_DIR;
    use crate::error::SimError;

    #[test]
    fn test_render_dockerfile() {
        let manifest = render_dockerfile("rancher/support-bundle-kit:master").unwrap();
        assert_eq!(
            manifest,
            "FROM rancher/support-bundle-kit:master\nEXPOSE 6443/tcp\nCOPY bundle /bundle\n"
        );
    }

    #[test]
    fn test_render_dockerfile_keeps_image_verbatim() {
        let image = "registry.local:5000/team/image@sha256:abc&def";
        let manifest = render_dockerfile(image).unwrap();
        let first = manifest.lines().next().unwrap();
        assert_eq!(first.strip_prefix("FROM "), Some(image));
    }

    #[test]
    fn test_template_constants_agree() {
        let manifest = render_dockerfile("x").unwrap();
        assert!(manifest.contains(&format!("EXPOSE {EXPOSED_PORT}")));
        assert!(manifest.contains(&format!("COPY {BUNDLE_DIR} {BUNDLE_MOUNT_PATH}")));
    }

    #[test]
    fn test_parse_segments() {
        let segments = parse("a {{ .X }} b {{.Y}}").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("a "),
                Segment::Variable("X"),
                Segment::Literal(" b "),
                Segment::Variable("Y"),
            ]
        );
    }

    #[test]
    fn test_unclosed_placeholder() {
        let result = render_with("FROM {{ .BaseImage", |_| Some("x"));
        assert!(matches!(result, Err(SimError::TemplateRender { .. })));
    }

    #[test]
    fn test_unmatched_close() {
        let result = render_with("FROM x }}", |_| Some("x"));
        assert!(matches!(result, Err(SimError::TemplateRender { .. })));
    }

    #[test]
    fn test_unmatched_close_between_placeholders() {
        let result = render_with("a }} {{ .X }}", |_| Some("x"));
        assert!(matches!(result, Err(SimError::TemplateRender { .. })));
    }

    #[test]
    fn test_invalid_placeholder() {
        let result = render_with("FROM {{ BaseImage }}", |_| Some("x"));
        assert!(matches!(result, Err(SimError::TemplateRender { .. })));
    }

    #[test]
    fn test_unknown_variable() {
        let result = render_with("FROM {{ .Other }}", |_| None);
        match result {
            Err(SimError::TemplateRender { reason }) => assert!(reason.contains(".Other")),
            other => panic!("expected TemplateRender, got {other:?}"),
        }
    }
}
