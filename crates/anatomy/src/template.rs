//! Project-level path templating ("anatomy").
//!
//! Converts a [`RepresentationEntity`] descriptor into a concrete published
//! path using a project-configured [upon] template. The template syntax
//! follows upon's Mustache-like conventions (`{{ variable }}`,
//! `{{ value|formatter }}`), extended with two pipeline-specific helpers:
//!
//! - **`slug`**: Converts strings to path-safe slugs, stripping quotation
//!   marks first to avoid artifacts like leading/trailing hyphens.
//! - **`pad`**: Zero-pads an integer to a minimum width, usable as either
//!   `pad(version, n)` or `{{ version|pad: n }}`. Version directories are
//!   conventionally rendered as `v001`, `v002`, ...
//!
//! # Template Variables
//!
//! | Variable         | Type      | Description                                 |
//! |------------------|-----------|---------------------------------------------|
//! | `roots`          | map       | Named project roots (e.g. `roots.publish`)  |
//! | `project`        | `String`  | Project name                                |
//! | `folder`         | `String`  | Short folder name (last path segment)       |
//! | `product`        | `String`  | Product name (e.g. `audioMain`)             |
//! | `version`        | `i64`     | Version number                              |
//! | `representation` | `String`  | File stem of the representation             |
//! | `ext`            | `String`  | File extension without the leading dot      |
//!
//! # Example
//!
//! ```
//! use slate_anatomy::Anatomy;
//! use slate_entity::{RepresentationContext, RepresentationEntity};
//!
//! let anatomy = Anatomy::new(
//!     "demo",
//!     [("publish", "/pub")],
//!     "{{ roots.publish }}/{{ folder }}/v{{ version|pad: 3 }}/{{ representation }}.{{ ext }}",
//! ).unwrap();
//!
//! let repre = RepresentationEntity::new(
//!     "r1",
//!     "v1",
//!     "wav",
//!     RepresentationContext::new("sh010", "audioMain", 4, "sh010", "wav"),
//! );
//! let path = anatomy.resolve_representation(&repre).unwrap();
//! assert_eq!(path, "/pub/sh010/v004/sh010.wav");
//! ```

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use slate_entity::{RepresentationContext, RepresentationEntity};
use std::collections::BTreeMap;
use tracing::instrument;
use upon::{Engine, Template};

/// Default template for published representation paths.
pub const DEFAULT_PUBLISH_TEMPLATE: &str = "{{ roots.publish }}/{{ project }}/{{ folder }}/publish/{{ product }}/v{{ version|pad: 3 }}/{{ representation }}.{{ ext }}";

/// Turns representation descriptors into deterministic published paths for
/// one project.
///
/// Holds the project name, the named roots, and the compiled publish
/// template. The template is compiled eagerly in [`Anatomy::new`] so syntax
/// errors surface at configuration time rather than mid-collection; the
/// compiled template is reused across any number of
/// [`resolve_representation`](Self::resolve_representation) calls.
pub struct Anatomy {
    project: String,
    roots: BTreeMap<String, String>,
    engine: Engine<'static>,
    template: Template<'static>,
}

impl Anatomy {
    /// Compile a project anatomy from its roots and publish template.
    ///
    /// Registers the `slug` formatter and `pad` function before compiling,
    /// so both are available in the template. Returns
    /// [`ErrorKind::Template`] if the template syntax is invalid.
    pub fn new(
        project: impl Into<String>,
        roots: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
        template: impl AsRef<str>,
    ) -> Result<Self> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        // Compile the template early so we can fail-fast in construction.
        let template = engine.compile(template.as_ref().to_string()).or_raise(|| ErrorKind::Template)?;
        Ok(Self {
            project: project.into(),
            roots: roots.into_iter().map(|(name, path)| (name.into(), path.into())).collect(),
            engine,
            template,
        })
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Renders the publish template against the representation's captured
    /// context, returning the normalized concrete path.
    ///
    /// A descriptor whose context does not satisfy the template (or a
    /// template referencing an unconfigured root) fails with
    /// [`ErrorKind::Template`].
    #[instrument(skip_all, fields(representation = %repre.id))]
    pub fn resolve_representation(&self, repre: &RepresentationEntity) -> Result<String> {
        let path = self
            .template
            .render(&self.engine, self.parameters(&repre.context))
            .to_string()
            .or_raise(|| ErrorKind::Template)?;
        Self::normalize(path)
    }

    /// Trims each path segment, drops empty segments (keeping a leading `/`
    /// for absolute roots), and rejects templates rendering to nothing.
    fn normalize(s: impl Into<String>) -> Result<String> {
        let s = s.into();
        let trimmed = s.trim();
        let absolute = trimmed.starts_with('/');
        let joined = trimmed.split('/').map(str::trim).filter(|segment| !segment.is_empty()).collect::<Vec<_>>().join("/");
        if joined.is_empty() {
            exn::bail!(ErrorKind::Template);
        }
        Ok(if absolute { format!("/{joined}") } else { joined })
    }

    /// Builds the [`upon::Value`] map exposed to the template engine.
    fn parameters(&self, ctx: &RepresentationContext) -> upon::Value {
        let roots = upon::Value::Map(
            self.roots.iter().map(|(name, path)| (name.clone(), upon::Value::from(path.as_str()))).collect(),
        );
        upon::value! {
            roots: roots,
            project: self.project.as_str(),
            folder: ctx.folder.as_str(),
            product: ctx.product.as_str(),
            version: ctx.version,
            representation: ctx.representation.as_str(),
            ext: ctx.ext.as_str(),
        }
    }
}

/// Custom [`upon`] extensions for path-safe string manipulation.
mod addons {
    use rslug::slugify;
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    /// Custom formatter that converts strings to path-safe slugs.
    ///
    /// Quotation marks are removed up front so that quoted words don't turn
    /// into stray hyphens in the slug.
    fn slug_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => {
                let stripped: String = s.chars().filter(|c| !is_quote_mark(*c)).collect();
                write!(f, "{}", slugify!(&stripped))?;
            },
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    fn is_quote_mark(c: char) -> bool {
        matches!(
            c,
            '\u{0027}'
                | '\u{0022}'
                | '\u{2018}'
                | '\u{2019}'
                | '\u{201B}'
                | '\u{201C}'
                | '\u{201D}'
                | '\u{201E}'
                | '\u{0060}'
                | '\u{00AB}'
                | '\u{00BB}'
                | '\u{2039}'
                | '\u{203A}'
        )
    }

    /// Zero-pads an integer to a minimum width (`4` with width 3 → `"004"`).
    fn zero_pad(value: i64, width: usize) -> String {
        format!("{value:0width$}")
    }

    /// Registers the `slug` formatter and `pad` function on the given engine.
    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("slug", slug_formatter);
        engine.add_function("pad", zero_pad);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn make_repre(folder: &str, version: i64) -> RepresentationEntity {
        RepresentationEntity::new(
            "r1",
            "v1",
            "wav",
            RepresentationContext::new(folder, "audioMain", version, folder, "wav"),
        )
    }

    #[test]
    fn test_default_template_resolves() {
        let anatomy = Anatomy::new("demo", [("publish", "/pub")], DEFAULT_PUBLISH_TEMPLATE).unwrap();
        let path = anatomy.resolve_representation(&make_repre("sh010", 12)).unwrap();
        assert_eq!(path, "/pub/demo/sh010/publish/audioMain/v012/sh010.wav");
    }

    #[test]
    fn test_invalid_template_fails_at_construction() {
        let result = Anatomy::new("demo", [("publish", "/pub")], "{{ unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_root_fails_at_render() {
        let anatomy = Anatomy::new("demo", [("publish", "/pub")], "{{ roots.work }}/{{ folder }}").unwrap();
        let err = anatomy.resolve_representation(&make_repre("sh010", 1)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Template));
    }

    #[rstest]
    #[case(1, "v001")]
    #[case(42, "v042")]
    #[case(1234, "v1234")]
    fn test_pad_filter_zero_pads_versions(#[case] version: i64, #[case] expected: &str) {
        let anatomy = Anatomy::new("demo", [("publish", "/pub")], "v{{ version|pad: 3 }}").unwrap();
        let path = anatomy.resolve_representation(&make_repre("sh010", version)).unwrap();
        assert_eq!(path, expected);
    }

    #[test]
    fn test_pad_classic_function_call() {
        let anatomy = Anatomy::new("demo", [("publish", "/pub")], "v{{ pad(version, 3) }}").unwrap();
        let path = anatomy.resolve_representation(&make_repre("sh010", 7)).unwrap();
        assert_eq!(path, "v007");
    }

    #[test]
    fn test_slug_strips_quotes() {
        let anatomy = Anatomy::new("demo", [("publish", "/pub")], "{{ product|slug }}").unwrap();
        let repre = RepresentationEntity::new(
            "r1",
            "v1",
            "wav",
            RepresentationContext::new("sh010", "\"Hero's\" Theme", 1, "sh010", "wav"),
        );
        assert_eq!(anatomy.resolve_representation(&repre).unwrap(), "heros-theme");
    }

    #[test]
    fn test_normalize_collapses_separators() {
        // An empty root should not leave a double slash behind.
        let anatomy = Anatomy::new("demo", [("publish", "/pub/")], "{{ roots.publish }}/{{ folder }}//{{ ext }}")
            .unwrap();
        let path = anatomy.resolve_representation(&make_repre("sh010", 1)).unwrap();
        assert_eq!(path, "/pub/sh010/wav");
    }

    #[test]
    fn test_relative_paths_stay_relative() {
        let anatomy = Anatomy::new("demo", [("publish", "pub")], "{{ roots.publish }}/{{ folder }}").unwrap();
        let path = anatomy.resolve_representation(&make_repre("sh010", 1)).unwrap();
        assert_eq!(path, "pub/sh010");
    }

    #[test]
    fn test_empty_render_is_an_error() {
        let anatomy = Anatomy::new("demo", [("publish", "")], "{{ roots.publish }}").unwrap();
        assert!(anatomy.resolve_representation(&make_repre("sh010", 1)).is_err());
    }
}
