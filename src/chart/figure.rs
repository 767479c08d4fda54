use crate::chart::Chart;
use crate::style::{Dimensions, StyleDefinition};
use serde::Serialize;
use serde_json::{Map, Value};

/// A Plotly figure document: a list of traces and a layout.
///
/// Traces and layout fragments are plain JSON so every Plotly attribute is
/// reachable. The applied style is embedded as `layout.template`.
///
/// # Examples
///
/// ```
/// use climatevis::Figure;
/// use serde_json::json;
///
/// let mut figure = Figure::new();
/// figure.add_trace(json!({ "type": "scatter", "x": [1, 2], "y": [3.5, 4.0] }));
/// figure.update_layout(json!({ "xaxis": { "title": { "text": "Hour" } } }));
///
/// let document = figure.to_value();
/// assert_eq!(document["layout"]["xaxis"]["title"]["text"], "Hour");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    data: Vec<Value>,
    layout: Map<String, Value>,
    #[serde(skip)]
    style_name: Option<String>,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_trace(&mut self, trace: Value) {
        self.data.push(trace);
    }

    /// Deep-merges `patch` into the layout. Objects merge key by key; any other
    /// value replaces what was there. Non-object patches are ignored.
    pub fn update_layout(&mut self, patch: Value) {
        if let Value::Object(patch) = patch {
            merge(&mut self.layout, patch);
        }
    }

    pub fn add_annotation(&mut self, annotation: Value) {
        self.push_layout_item("annotations", annotation);
    }

    pub fn add_shape(&mut self, shape: Value) {
        self.push_layout_item("shapes", shape);
    }

    fn push_layout_item(&mut self, key: &str, item: Value) {
        let slot = self
            .layout
            .entry(key)
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => items.push(item),
            other => *other = Value::Array(vec![item]),
        }
    }

    pub fn traces(&self) -> &[Value] {
        &self.data
    }

    pub fn layout(&self) -> &Map<String, Value> {
        &self.layout
    }

    /// Name of the style last applied through [`Chart::set_style`].
    pub fn style_name(&self) -> Option<&str> {
        self.style_name.as_deref()
    }

    pub fn width(&self) -> Option<u32> {
        self.layout_pixels("width")
    }

    pub fn height(&self) -> Option<u32> {
        self.layout_pixels("height")
    }

    fn layout_pixels(&self, key: &str) -> Option<u32> {
        self.layout
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    }

    /// The `{"data": [...], "layout": {...}}` document.
    pub fn to_value(&self) -> Value {
        let mut document = Map::with_capacity(2);
        document.insert("data".to_string(), Value::Array(self.data.clone()));
        document.insert("layout".to_string(), Value::Object(self.layout.clone()));
        Value::Object(document)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Chart for Figure {
    fn set_style(&mut self, name: &str, definition: &StyleDefinition) {
        self.layout.insert("template".to_string(), definition.to_value());
        self.style_name = Some(name.to_string());
    }

    fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.layout.insert("width".to_string(), dimensions.width.into());
        self.layout.insert("height".to_string(), dimensions.height.into());
    }
}

fn merge(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        let slot = target.entry(key).or_insert(Value::Null);
        match (slot, value) {
            (Value::Object(existing), Value::Object(incoming)) => merge(existing, incoming),
            (slot, value) => *slot = value,
        }
    }
}
