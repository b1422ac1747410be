use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Mask layer number. Negative layers are construction-only and never drawn.
pub type LayerId = i32;

const DEFAULT_COLORS: [&str; 10] = [
    "blue", "orange", "green", "red", "purple", "brown", "pink", "gray", "olive", "cyan",
];

/// Colour assignment and visibility of mask layers.
///
/// Layers cycle through `colors` by layer number unless they have an entry in
/// `overrides`. Colours are any CSS colour string the chart accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerPalette {
    pub colors: Vec<String>,
    pub overrides: BTreeMap<LayerId, String>,
    pub hidden: BTreeSet<LayerId>,
}

impl Default for LayerPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            overrides: BTreeMap::new(),
            hidden: BTreeSet::new(),
        }
    }
}

impl LayerPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colour for `layer`, or `None` if the layer is not drawn.
    pub fn color_for(&self, layer: LayerId) -> Option<&str> {
        if !self.is_visible(layer) {
            return None;
        }
        if let Some(color) = self.overrides.get(&layer) {
            return Some(color);
        }
        if self.colors.is_empty() {
            return None;
        }
        let idx = (layer as usize) % self.colors.len();
        Some(&self.colors[idx])
    }

    pub fn with_color(mut self, layer: LayerId, color: &str) -> Self {
        self.set_color(layer, color);
        self
    }

    pub fn set_color(&mut self, layer: LayerId, color: &str) {
        self.overrides.insert(layer, color.to_string());
    }

    pub fn is_visible(&self, layer: LayerId) -> bool {
        layer >= 0 && !self.hidden.contains(&layer)
    }

    pub fn toggle_visibility(&mut self, layer: LayerId) {
        if !self.hidden.remove(&layer) {
            self.hidden.insert(layer);
        }
    }

    pub fn set_all_visible(&mut self) {
        self.hidden.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_cycle() {
        let palette = LayerPalette::default();
        assert_eq!(palette.color_for(0), Some("blue"));
        assert_eq!(palette.color_for(3), Some("red"));
        assert_eq!(palette.color_for(10), Some("blue"));
        assert_eq!(palette.color_for(19), Some("cyan"));
    }

    #[test]
    fn test_negative_layers_not_drawn() {
        let palette = LayerPalette::default();
        assert_eq!(palette.color_for(-1), None);
        assert!(!palette.is_visible(-5));
    }

    #[test]
    fn test_override_and_hide() {
        let mut palette = LayerPalette::default().with_color(2, "#ff00ff");
        assert_eq!(palette.color_for(2), Some("#ff00ff"));
        palette.toggle_visibility(2);
        assert_eq!(palette.color_for(2), None);
        palette.toggle_visibility(2);
        assert!(palette.is_visible(2));
        palette.toggle_visibility(4);
        palette.set_all_visible();
        assert!(palette.is_visible(4));
    }

    #[test]
    fn test_empty_colors() {
        let palette = LayerPalette {
            colors: Vec::new(),
            ..Default::default()
        };
        assert_eq!(palette.color_for(1), None);
    }
}
