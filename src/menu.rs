//! Per-button descriptors handed to whatever draws the menu.

use std::path::PathBuf;

use serde::Serialize;

use crate::bundle::resolve_icon;
use crate::classifier::{Classifier, ColorPair};
use crate::layout::{layout_entries, Canvas, Point};
use crate::store::Configuration;
use crate::theme::Theme;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MenuButton {
    pub name: String,
    pub command: String,
    pub icon: String,
    pub icon_path: Option<PathBuf>,
    pub display_name: String,
    pub category: &'static str,
    pub colors: ColorPair,
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
}

impl MenuButton {
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.diameter / 2.0,
            y: self.y + self.diameter / 2.0,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let c = self.center();
        let r = self.diameter / 2.0;
        (x - c.x).powi(2) + (y - c.y).powi(2) <= r * r
    }
}

/// One button per favorite, in configuration order.
pub fn build_menu(
    config: &Configuration,
    classifier: &dyn Classifier,
    theme: &Theme,
    canvas: Canvas,
) -> Vec<MenuButton> {
    let favorites = config.favorites();
    let points = layout_entries(&favorites, canvas, theme.button_size, theme.radius());

    favorites
        .into_iter()
        .zip(points)
        .map(|(app, point)| {
            let info = classifier.classify(&app.name);
            MenuButton {
                name: app.name.clone(),
                command: app.command.clone(),
                icon: info.icon,
                icon_path: resolve_icon(app),
                display_name: info.display_name,
                category: info.category,
                colors: info.colors,
                x: point.x,
                y: point.y,
                diameter: theme.button_size,
            }
        })
        .collect()
}

/// Button under the pointer. Later buttons are drawn on top, so they win.
pub fn hit_test(buttons: &[MenuButton], x: f64, y: f64) -> Option<&MenuButton> {
    buttons.iter().rev().find(|button| button.contains(x, y))
}
