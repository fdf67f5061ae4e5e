//! Core of a radial application launcher: favorites configuration, name
//! classification, circular layout and command launching.

pub mod bundle;
pub mod classifier;
pub mod error;
pub mod layout;
pub mod launcher;
pub mod menu;
pub mod paths;
pub mod store;
pub mod theme;

pub use classifier::{create_classifier, Classification, Classifier, ClassifierKind};
pub use error::{LaunchError, StoreError};
pub use layout::{layout, Canvas, Point, Radius};
pub use launcher::{LaunchPlan, Launched, Launcher};
pub use menu::{build_menu, hit_test, MenuButton};
pub use store::{AppEntry, Configuration};
pub use theme::Theme;
