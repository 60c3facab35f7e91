//! Keyboard-driven debug panel bound to the shared material.

use crate::math::{format_hex_color, hsl_to_rgb, rgb_to_hsl};
use crate::scene::Material;

/// Hue change per step, as a fraction of a full turn
const HUE_STEP: f64 = 1.0 / 360.0;

/// Material property a control reads and writes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    Hue,
    Saturation,
    Lightness,
    Metalness,
    Roughness,
}

/// Material colour as unrounded HSL, so small steps accumulate
#[derive(Clone, Debug, Default)]
struct ColorState {
    hsl: [f64; 3],
    /// RGB last written to the material; anything else means an outside edit
    rgb: Option<[u8; 3]>,
}

impl ColorState {
    fn sync(&mut self, material: &Material) -> &mut [f64; 3] {
        if self.rgb != Some(material.color) {
            self.hsl = rgb_to_hsl(&material.color);
            self.rgb = Some(material.color);
        }
        &mut self.hsl
    }

    fn store(&mut self, material: &mut Material) {
        material.color = hsl_to_rgb(&self.hsl);
        self.rgb = Some(material.color);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ControlKind {
    /// Wraps around [0, 1), shown in degrees
    Cyclic { step: f64 },
    Number {
        min: Option<f64>,
        max: Option<f64>,
        step: f64,
    },
}

#[derive(Clone, Debug)]
pub struct Control {
    label: &'static str,
    binding: Binding,
    kind: ControlKind,
}

impl Control {
    pub fn min(&mut self, min: f64) -> &mut Self {
        if let ControlKind::Number { min: bound, .. } = &mut self.kind {
            *bound = Some(min);
        }
        self
    }

    pub fn max(&mut self, max: f64) -> &mut Self {
        if let ControlKind::Number { max: bound, .. } = &mut self.kind {
            *bound = Some(max);
        }
        self
    }

    pub fn step(&mut self, step: f64) -> &mut Self {
        match &mut self.kind {
            ControlKind::Cyclic { step: size } | ControlKind::Number { step: size, .. } => {
                *size = step
            }
        }
        self
    }

    /// Value after moving `value` by `steps` increments
    fn stepped(&self, value: f64, steps: i32) -> f64 {
        match self.kind {
            ControlKind::Cyclic { step } => (value + steps as f64 * step).rem_euclid(1.0),
            ControlKind::Number { min, max, step } => {
                let origin = min.unwrap_or(0.0);
                let raw = value + steps as f64 * step;
                let snapped = origin + ((raw - origin) / step).round() * step;
                let snapped = min.map_or(snapped, |min| snapped.max(min));
                max.map_or(snapped, |max| snapped.min(max))
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DebugPanel {
    controls: Vec<Control>,
    selected: usize,
    color: ColorState,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel with the material colour (as HSL), metalness and roughness controls
    pub fn for_material() -> Self {
        let mut panel = DebugPanel::new();
        panel.add_hue("hue", Binding::Hue);
        panel.add("saturation", Binding::Saturation).min(0.0).max(1.0).step(0.01);
        panel.add("lightness", Binding::Lightness).min(0.0).max(1.0).step(0.01);
        panel.add("metalness", Binding::Metalness).min(0.0).max(1.0).step(0.001);
        panel.add("roughness", Binding::Roughness).min(0.0).max(1.0).step(0.001);
        panel
    }

    /// Adds a wrapping control stepping a full turn in 360 increments
    pub fn add_hue(&mut self, label: &'static str, binding: Binding) -> &mut Control {
        self.push(label, binding, ControlKind::Cyclic { step: HUE_STEP })
    }

    /// Adds a numeric control; unbounded with unit step until configured
    pub fn add(&mut self, label: &'static str, binding: Binding) -> &mut Control {
        let kind = ControlKind::Number {
            min: None,
            max: None,
            step: 1.0,
        };
        self.push(label, binding, kind)
    }

    fn push(&mut self, label: &'static str, binding: Binding, kind: ControlKind) -> &mut Control {
        self.controls.push(Control {
            label,
            binding,
            kind,
        });
        let last = self.controls.len() - 1;
        &mut self.controls[last]
    }

    #[cfg(test)]
    pub fn selected(&self) -> Option<Binding> {
        self.controls.get(self.selected).map(|c| c.binding)
    }

    pub fn select_next(&mut self) {
        if !self.controls.is_empty() {
            self.selected = (self.selected + 1) % self.controls.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.controls.is_empty() {
            self.selected = (self.selected + self.controls.len() - 1) % self.controls.len();
        }
    }

    fn get(&mut self, binding: Binding, material: &Material) -> f64 {
        match binding {
            Binding::Hue => self.color.sync(material)[0],
            Binding::Saturation => self.color.sync(material)[1],
            Binding::Lightness => self.color.sync(material)[2],
            Binding::Metalness => material.metalness,
            Binding::Roughness => material.roughness,
        }
    }

    fn set(&mut self, binding: Binding, material: &mut Material, value: f64) {
        let channel = match binding {
            Binding::Hue => 0,
            Binding::Saturation => 1,
            Binding::Lightness => 2,
            Binding::Metalness => {
                material.metalness = value;
                return;
            }
            Binding::Roughness => {
                material.roughness = value;
                return;
            }
        };
        self.color.sync(material)[channel] = value;
        self.color.store(material);
    }

    /// Moves the selected control by `steps` increments
    pub fn adjust(&mut self, material: &mut Material, steps: i32) {
        let Some(control) = self.controls.get(self.selected).cloned() else {
            return;
        };
        let value = self.get(control.binding, material);
        let next = control.stepped(value, steps);
        self.set(control.binding, material, next);
    }

    /// One line per control, the selected one marked
    pub fn lines(&mut self, material: &Material) -> Vec<String> {
        let controls = self.controls.clone();
        controls
            .iter()
            .enumerate()
            .map(|(i, control)| {
                let marker = if i == self.selected { '>' } else { ' ' };
                let value = self.get(control.binding, material);
                let text = match control.kind {
                    ControlKind::Cyclic { .. } => format!(
                        "{:<10} {:5.1} {}",
                        control.label,
                        value * 360.0,
                        format_hex_color(&material.color)
                    ),
                    ControlKind::Number { .. } => format!("{:<10} {:.3}", control.label, value),
                };
                format!("{marker} {text}")
            })
            .collect()
    }
}
