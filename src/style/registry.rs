use crate::chart::Chart;
use crate::style::definition::StyleDefinition;
use crate::style::error::StyleError;
use crate::style::paper_size::{resolve_paper_size, Dimensions};
use log::{debug, error, info};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// Style used by chart builders when none is given.
pub const DEFAULT_STYLE: &str = "base";

/// Names of the styles bundled with the crate.
pub const BUILTIN_STYLE_NAMES: [&str; 3] = ["base", "base_autosize", "test"];

const BUILTIN_SOURCES: [(&str, &str); 3] = [
    ("base", include_str!("../../styles/base.json")),
    ("base_autosize", include_str!("../../styles/base_autosize.json")),
    ("test", include_str!("../../styles/test.json")),
];

/// A bundled style that could not be registered.
#[derive(Debug)]
pub struct StyleLoadFailure {
    pub name: String,
    pub error: StyleError,
}

/// Name -> [`StyleDefinition`] map plus the logic to stamp a style and paper size
/// onto a chart.
///
/// Styles are added or overwritten, never removed.
///
/// # Examples
///
/// ```
/// use climatevis::{Figure, StyleRegistry};
///
/// let registry = StyleRegistry::with_builtin_styles();
/// let mut figure = Figure::new();
/// registry.apply(&mut figure, "base", Some("A5_LANDSCAPE"))?;
///
/// assert_eq!(figure.width(), Some(794));
/// # Ok::<(), climatevis::StyleError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    styles: HashMap<String, StyleDefinition>,
}

impl StyleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every bundled style.
    ///
    /// Bundled styles that fail to parse are logged and left out.
    pub fn with_builtin_styles() -> Self {
        let mut registry = Self::new();
        registry.load_builtin_styles();
        registry
    }

    /// Registers every bundled style under its own name.
    ///
    /// Loading is idempotent and isolated per style: a style that fails is
    /// logged, skipped, and reported in the returned list while the others
    /// still load.
    pub fn load_builtin_styles(&mut self) -> Vec<StyleLoadFailure> {
        self.load_sources(&BUILTIN_SOURCES)
    }

    /// Registers each `(name, json)` source, collecting the ones that fail.
    fn load_sources(&mut self, sources: &[(&str, &str)]) -> Vec<StyleLoadFailure> {
        let mut failures = Vec::new();
        for (name, source) in sources {
            match StyleDefinition::from_json(source) {
                Ok(definition) => {
                    self.register(*name, definition);
                    info!("Auto-loaded style '{}'", name);
                }
                Err(e) => {
                    error!("Failed to auto-load style '{}': {}", name, e);
                    failures.push(StyleLoadFailure {
                        name: name.to_string(),
                        error: e,
                    });
                }
            }
        }
        failures
    }

    /// Registers one bundled style, under `register_as` when given.
    ///
    /// # Errors
    ///
    /// [`StyleError::UnknownStyle`] if `name` is not a bundled style, or the
    /// parse error of its document.
    pub fn load_builtin_style(
        &mut self,
        name: &str,
        register_as: Option<&str>,
    ) -> Result<&StyleDefinition, StyleError> {
        let (_, source) = BUILTIN_SOURCES
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .ok_or_else(|| StyleError::UnknownStyle {
                name: name.to_string(),
                available: Self::builtin_style_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })?;
        let target = register_as.unwrap_or(name);
        self.register(target, StyleDefinition::from_json(source)?);
        self.get(target)
    }

    /// Inserts or overwrites a style.
    pub fn register(&mut self, name: impl Into<String>, definition: StyleDefinition) {
        let name = name.into();
        debug!("Style '{}' layout keys: {:?}", name, definition.summary());
        info!("Style '{}' registered", name);
        self.styles.insert(name, definition);
    }

    /// Reads a style document from disk and registers it as `name`.
    ///
    /// Files ending in `.yaml` or `.yml` are read as YAML, anything else as JSON.
    ///
    /// # Errors
    ///
    /// [`StyleError::Read`] if the file cannot be read, [`StyleError::Parse`] or
    /// [`StyleError::ParseYaml`] for an invalid document, [`StyleError::Malformed`]
    /// when it lacks a `layout` object.
    pub fn register_from_file(
        &mut self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<(), StyleError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read style file {}: {}", path.display(), e);
            StyleError::Read(path.to_path_buf(), e)
        })?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        let definition = if is_yaml {
            StyleDefinition::from_yaml(&text)?
        } else {
            StyleDefinition::from_json(&text)?
        };
        self.register(name, definition);
        Ok(())
    }

    /// The names currently registered.
    pub fn registered_names(&self) -> BTreeSet<&str> {
        self.styles.keys().map(String::as_str).collect()
    }

    /// Bundled names plus registered names, sorted and deduplicated.
    pub fn available_styles(&self) -> Vec<String> {
        let mut names: BTreeSet<&str> = self.registered_names();
        names.extend(BUILTIN_STYLE_NAMES);
        names.into_iter().map(str::to_string).collect()
    }

    pub fn builtin_style_names() -> Vec<&'static str> {
        BUILTIN_STYLE_NAMES.to_vec()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    /// Borrows a registered style.
    ///
    /// # Errors
    ///
    /// [`StyleError::UnknownStyle`] listing the registered names.
    pub fn get(&self, name: &str) -> Result<&StyleDefinition, StyleError> {
        self.styles.get(name).ok_or_else(|| StyleError::UnknownStyle {
            name: name.to_string(),
            available: self.registered_names().into_iter().map(str::to_string).collect(),
        })
    }

    /// Pixel dimensions of a named paper size.
    pub fn resolve_paper_size(&self, name: &str) -> Result<Dimensions, StyleError> {
        resolve_paper_size(name)
    }

    /// Stamps `style_name` and, unless the style autosizes, `paper_size` onto `chart`.
    ///
    /// The style is checked before anything else. An autosizing style ignores the
    /// paper size entirely, so an unknown paper size name is not an error there.
    /// Without a paper size the chart keeps its default dimensions.
    ///
    /// # Errors
    ///
    /// * [`StyleError::UnknownStyle`] if `style_name` is not registered.
    /// * [`StyleError::UnknownPaperSize`] if `paper_size` is not a known size.
    pub fn apply<C: Chart + ?Sized>(
        &self,
        chart: &mut C,
        style_name: &str,
        paper_size: Option<&str>,
    ) -> Result<(), StyleError> {
        let definition = self.get(style_name).inspect_err(|_| {
            error!("Style '{}' is not registered", style_name);
        })?;

        chart.set_style(style_name, definition);
        info!("Style '{}' applied to chart", style_name);

        if definition.autosize() {
            info!(
                "Style '{}' has autosize enabled. Ignoring paper size setting",
                style_name
            );
            return Ok(());
        }
        if let Some(paper_size) = paper_size {
            let dimensions = resolve_paper_size(paper_size).inspect_err(|e| {
                error!("{}", e);
            })?;
            chart.set_dimensions(dimensions);
            info!(
                "Paper size '{}' applied: width={}, height={}",
                paper_size, dimensions.width, dimensions.height
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Figure;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_styles_register_exactly_three() {
        let mut registry = StyleRegistry::new();

        let failures = registry.load_builtin_styles();

        assert!(failures.is_empty());
        assert_eq!(
            registry.registered_names(),
            BTreeSet::from(["base", "base_autosize", "test"])
        );
    }

    #[test]
    fn test_bad_source_is_skipped_and_reported() {
        let mut registry = StyleRegistry::new();
        let sources = [
            ("base", BUILTIN_SOURCES[0].1),
            ("broken", r#"{"layout": "#),
            ("test", BUILTIN_SOURCES[2].1),
        ];

        let failures = registry.load_sources(&sources);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "broken");
        assert!(matches!(failures[0].error, StyleError::Parse(_)));
        assert_eq!(registry.registered_names(), BTreeSet::from(["base", "test"]));
    }

    #[test]
    fn test_loading_builtin_styles_twice_is_idempotent() {
        let mut registry = StyleRegistry::with_builtin_styles();
        let before = registry.get("base").cloned().ok();

        registry.load_builtin_styles();

        assert_eq!(registry.registered_names().len(), 3);
        assert_eq!(registry.get("base").cloned().ok(), before);
    }

    #[test]
    fn test_bundled_autosize_flags() -> Result<(), StyleError> {
        let registry = StyleRegistry::with_builtin_styles();

        assert!(!registry.get("base")?.autosize());
        assert!(registry.get("base_autosize")?.autosize());
        assert!(!registry.get("test")?.autosize());
        Ok(())
    }

    #[test]
    fn test_apply_sets_style_and_paper_size() -> Result<(), StyleError> {
        let registry = StyleRegistry::with_builtin_styles();
        let mut figure = Figure::new();

        registry.apply(&mut figure, "base", Some("A4_LANDSCAPE"))?;

        assert_eq!(figure.style_name(), Some("base"));
        assert_eq!(figure.width(), Some(1123));
        assert_eq!(figure.height(), Some(794));
        Ok(())
    }

    #[test]
    fn test_autosize_ignores_any_paper_size() -> Result<(), StyleError> {
        let registry = StyleRegistry::with_builtin_styles();

        for paper_size in [Some("A4_LANDSCAPE"), Some("NOT_A_SIZE"), None] {
            let mut figure = Figure::new();
            registry.apply(&mut figure, "base_autosize", paper_size)?;

            assert_eq!(figure.style_name(), Some("base_autosize"));
            assert_eq!(figure.width(), None);
            assert_eq!(figure.height(), None);
        }
        Ok(())
    }

    #[test]
    fn test_unknown_style_fails_before_paper_size() {
        let registry = StyleRegistry::with_builtin_styles();
        let mut figure = Figure::new();

        let result = registry.apply(&mut figure, "nonexistent", Some("NOT_A_SIZE"));

        assert!(matches!(result, Err(StyleError::UnknownStyle { ref name, .. }) if name == "nonexistent"));
        assert_eq!(figure.style_name(), None);
    }

    #[test]
    fn test_invalid_paper_size_with_fixed_style() {
        let registry = StyleRegistry::with_builtin_styles();
        let mut figure = Figure::new();

        let result = registry.apply(&mut figure, "base", Some("A7_LANDSCAPE"));

        assert!(matches!(result, Err(StyleError::UnknownPaperSize(_))));
    }

    #[test]
    fn test_no_paper_size_keeps_default_dimensions() -> Result<(), StyleError> {
        let registry = StyleRegistry::with_builtin_styles();
        let mut figure = Figure::new();

        registry.apply(&mut figure, "test", None)?;

        assert_eq!(figure.width(), None);
        Ok(())
    }

    #[test]
    fn test_register_overwrites() -> Result<(), StyleError> {
        let mut registry = StyleRegistry::with_builtin_styles();
        let custom = StyleDefinition::from_value(json!({ "layout": { "autosize": true } }))?;

        registry.register("base", custom);

        assert!(registry.get("base")?.autosize());
        assert_eq!(registry.registered_names().len(), 3);
        Ok(())
    }

    #[test]
    fn test_register_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"layout": {{"font": {{"family": "Courier"}}}}}}"#)?;
        let mut registry = StyleRegistry::new();

        registry.register_from_file("report", file.path())?;

        assert!(registry.contains("report"));
        assert_eq!(registry.get("report")?.summary(), vec!["font"]);
        Ok(())
    }

    #[test]
    fn test_register_from_yaml_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
        writeln!(file, "layout:")?;
        writeln!(file, "  autosize: true")?;
        writeln!(file, "  font:")?;
        writeln!(file, "    family: Courier")?;
        let mut registry = StyleRegistry::new();

        registry.register_from_file("dashboard", file.path())?;

        let style = registry.get("dashboard")?;
        assert!(style.autosize());
        assert_eq!(style.summary(), vec!["autosize", "font"]);
        Ok(())
    }

    #[test]
    fn test_register_from_missing_file() {
        let mut registry = StyleRegistry::new();

        let result = registry.register_from_file("report", "/definitely/not/here.json");

        assert!(matches!(result, Err(StyleError::Read(_, _))));
        assert!(!registry.contains("report"));
    }

    #[test]
    fn test_load_builtin_style_under_custom_name() -> Result<(), StyleError> {
        let mut registry = StyleRegistry::new();

        let definition = registry.load_builtin_style("base_autosize", Some("dashboard"))?;

        assert!(definition.autosize());
        assert_eq!(registry.registered_names(), BTreeSet::from(["dashboard"]));
        Ok(())
    }

    #[test]
    fn test_available_styles_include_builtin_and_custom() -> Result<(), StyleError> {
        let mut registry = StyleRegistry::new();
        registry.register(
            "aardvark",
            StyleDefinition::from_value(json!({ "layout": {} }))?,
        );

        assert_eq!(
            registry.available_styles(),
            vec!["aardvark", "base", "base_autosize", "test"]
        );
        Ok(())
    }
}
