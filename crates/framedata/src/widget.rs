//! Paged hitbox display.
//!
//! A `Widget` owns the pages of one move plus two independent pieces of
//! display state: which page is shown and which image variant. Only the user
//! who ran the command may change either. Changing page always snaps the
//! image back to full speed; changing variant never moves the page.

use std::fmt;

use crate::resolve::Page;

/// Opaque platform user identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    #[default]
    FullSpeed,
    Slow,
}

impl Variant {
    pub const ALL: &'static [Variant] = &[Variant::FullSpeed, Variant::Slow];

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::FullSpeed => "full",
            Variant::Slow => "slow",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "fullspeed" | "full speed" => Some(Variant::FullSpeed),
            "slow" | "slowmo" => Some(Variant::Slow),
            _ => None,
        }
    }

    /// Button text.
    pub fn label(self) -> &'static str {
        match self {
            Variant::FullSpeed => "Full Speed",
            Variant::Slow => "Slow",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlAction {
    SetVariant(Variant),
    SelectPage(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Control {
    pub label: String,
    pub action: ControlAction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPayload {
    pub title: String,
    pub label: String,
    pub body: String,
    pub image_url: String,
    pub page_index: usize,
    pub page_count: usize,
    pub variant: Variant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetError {
    NoPages,
    Unauthorized { actor: UserId },
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::NoPages => write!(f, "widget needs at least one page"),
            WidgetError::Unauthorized { actor } => {
                write!(f, "user {actor} does not own this widget")
            }
            WidgetError::OutOfRange { index, len } => {
                write!(f, "page {index} out of range (have {len})")
            }
        }
    }
}

impl std::error::Error for WidgetError {}

#[derive(Clone, Debug)]
pub struct Widget {
    pages: Vec<Page>,
    page_index: usize,
    variant: Variant,
    owner: UserId,
}

impl Widget {
    pub fn new(pages: Vec<Page>, owner: UserId) -> Result<Self, WidgetError> {
        if pages.is_empty() {
            return Err(WidgetError::NoPages);
        }
        Ok(Self {
            pages,
            page_index: 0,
            variant: Variant::FullSpeed,
            owner,
        })
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn render(&self) -> RenderedPayload {
        let page = &self.pages[self.page_index];
        let image_url = match self.variant {
            Variant::FullSpeed => &page.image_full_speed,
            Variant::Slow => &page.image_slow,
        };
        RenderedPayload {
            title: page.title.clone(),
            label: page.display_label(self.page_index),
            body: page.attribute_text(),
            image_url: image_url.clone(),
            page_index: self.page_index,
            page_count: self.pages.len(),
            variant: self.variant,
        }
    }

    pub fn select_page(
        &mut self,
        actor: &UserId,
        index: usize,
    ) -> Result<RenderedPayload, WidgetError> {
        self.authorize(actor)?;
        if index >= self.pages.len() {
            return Err(WidgetError::OutOfRange {
                index,
                len: self.pages.len(),
            });
        }
        self.page_index = index;
        self.variant = Variant::FullSpeed;
        Ok(self.render())
    }

    pub fn set_variant(
        &mut self,
        actor: &UserId,
        variant: Variant,
    ) -> Result<RenderedPayload, WidgetError> {
        self.authorize(actor)?;
        self.variant = variant;
        Ok(self.render())
    }

    pub fn apply(
        &mut self,
        actor: &UserId,
        action: &ControlAction,
    ) -> Result<RenderedPayload, WidgetError> {
        match *action {
            ControlAction::SetVariant(v) => self.set_variant(actor, v),
            ControlAction::SelectPage(i) => self.select_page(actor, i),
        }
    }

    /// Variant buttons always; one page button per hit only for multi-hit moves.
    pub fn controls(&self) -> Vec<Control> {
        let mut out = Variant::ALL
            .iter()
            .map(|&v| Control {
                label: v.label().to_string(),
                action: ControlAction::SetVariant(v),
            })
            .collect::<Vec<_>>();

        if self.pages.len() > 1 {
            out.extend(self.pages.iter().enumerate().map(|(i, p)| Control {
                label: p.display_label(i),
                action: ControlAction::SelectPage(i),
            }));
        }
        out
    }

    fn authorize(&self, actor: &UserId) -> Result<(), WidgetError> {
        if *actor != self.owner {
            return Err(WidgetError::Unauthorized {
                actor: actor.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Control, ControlAction, UserId, Variant, Widget, WidgetError};
    use crate::resolve::{Page, resolve};
    use crate::store::test_support::fixture_store;

    fn page(label: &str, n: u32) -> Page {
        Page {
            label: label.to_string(),
            title: "A Jab".to_string(),
            attribute_lines: vec![
                ("Damage".to_string(), format!("{n}%")),
                ("Angle".to_string(), "45°".to_string()),
            ],
            image_full_speed: format!("https://img.example/{n}.gif"),
            image_slow: format!("https://img.example/{n}s.gif"),
        }
    }

    fn owner() -> UserId {
        UserId::new("100")
    }

    fn stranger() -> UserId {
        UserId::new("200")
    }

    fn three_pages() -> Widget {
        Widget::new(vec![page("Hit 1", 1), page("Hit 2", 2), page("", 3)], owner()).unwrap()
    }

    #[test]
    fn empty_pages_rejected() {
        assert_eq!(
            Widget::new(Vec::new(), owner()).unwrap_err(),
            WidgetError::NoPages
        );
    }

    #[test]
    fn fresh_widget_renders_first_page_full_speed() {
        let w = three_pages();
        let r = w.render();
        assert_eq!(r.page_index, 0);
        assert_eq!(r.page_count, 3);
        assert_eq!(r.variant, Variant::FullSpeed);
        assert_eq!(r.label, "Hit 1");
        assert_eq!(r.title, "A Jab");
        assert_eq!(r.body, "Damage: 1%\nAngle: 45°");
        assert_eq!(r.image_url, "https://img.example/1.gif");
    }

    #[test]
    fn select_page_resets_variant() {
        let mut w = three_pages();
        w.set_variant(&owner(), Variant::Slow).unwrap();

        let r = w.select_page(&owner(), 2).unwrap();
        assert_eq!(r.page_index, 2);
        assert_eq!(r.variant, Variant::FullSpeed);
        assert_eq!(r.label, "Hit 3");
        assert_eq!(r.image_url, "https://img.example/3.gif");
        assert_eq!(w.render(), r);
    }

    #[test]
    fn set_variant_keeps_page() {
        let mut w = three_pages();
        w.select_page(&owner(), 1).unwrap();

        let r = w.set_variant(&owner(), Variant::Slow).unwrap();
        assert_eq!(r.page_index, 1);
        assert_eq!(r.image_url, "https://img.example/2s.gif");
        assert_eq!(w.page_index(), 1);
    }

    #[test]
    fn set_variant_is_idempotent() {
        let mut w = three_pages();
        let a = w.set_variant(&owner(), Variant::FullSpeed).unwrap();
        let b = w.set_variant(&owner(), Variant::FullSpeed).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn strangers_cannot_change_state() {
        let mut w = three_pages();
        w.select_page(&owner(), 1).unwrap();
        w.set_variant(&owner(), Variant::Slow).unwrap();
        let before = w.render();

        assert_eq!(
            w.select_page(&stranger(), 0).unwrap_err(),
            WidgetError::Unauthorized { actor: stranger() }
        );
        assert_eq!(
            w.set_variant(&stranger(), Variant::FullSpeed).unwrap_err(),
            WidgetError::Unauthorized { actor: stranger() }
        );
        // Authorization is checked before the index.
        assert!(matches!(
            w.select_page(&stranger(), 99),
            Err(WidgetError::Unauthorized { .. })
        ));

        assert_eq!(w.render(), before);
    }

    #[test]
    fn out_of_range_leaves_state_alone() {
        let mut w = three_pages();
        w.set_variant(&owner(), Variant::Slow).unwrap();
        assert_eq!(
            w.select_page(&owner(), 3).unwrap_err(),
            WidgetError::OutOfRange { index: 3, len: 3 }
        );
        assert_eq!(w.page_index(), 0);
        assert_eq!(w.variant(), Variant::Slow);
    }

    #[test]
    fn controls_for_multi_hit() {
        let w = three_pages();
        let labels = w
            .controls()
            .into_iter()
            .map(|c| c.label)
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["Full Speed", "Slow", "Hit 1", "Hit 2", "Hit 3"]);
    }

    #[test]
    fn controls_for_single_hit_are_variants_only() {
        let w = Widget::new(vec![page("Grab", 1)], owner()).unwrap();
        assert_eq!(
            w.controls(),
            vec![
                Control {
                    label: "Full Speed".to_string(),
                    action: ControlAction::SetVariant(Variant::FullSpeed),
                },
                Control {
                    label: "Slow".to_string(),
                    action: ControlAction::SetVariant(Variant::Slow),
                },
            ]
        );
    }

    #[test]
    fn apply_dispatches_controls() {
        let mut w = three_pages();
        let r = w.apply(&owner(), &ControlAction::SelectPage(1)).unwrap();
        assert_eq!(r.page_index, 1);
        let r = w
            .apply(&owner(), &ControlAction::SetVariant(Variant::Slow))
            .unwrap();
        assert_eq!(r.variant, Variant::Slow);
    }

    #[test]
    fn variant_parse_round_trips_as_str() {
        for &v in Variant::ALL {
            assert_eq!(Variant::parse(v.as_str()), Some(v));
        }
        assert_eq!(Variant::parse("medium"), None);
    }

    #[test]
    fn jab_scenario_end_to_end() {
        let (_dir, store) = fixture_store();
        let (_, pages) = resolve(&store, "A", "Jab").unwrap();
        assert_eq!(pages.len(), 2);

        let mut w = Widget::new(pages, owner()).unwrap();

        let r = w.select_page(&owner(), 1).unwrap();
        assert_eq!(r.label, "Hit 2");
        assert_eq!(r.body, "Damage: 5%\nAngle: 45°");
        assert_eq!(r.image_url, "https://img.example/jab2.gif");

        let r = w.set_variant(&owner(), Variant::Slow).unwrap();
        assert_eq!(r.label, "Hit 2");
        assert_eq!(r.image_url, "https://img.example/jab2s.gif");

        assert!(matches!(
            w.select_page(&stranger(), 0),
            Err(WidgetError::Unauthorized { .. })
        ));
        let r = w.render();
        assert_eq!(r.label, "Hit 2");
        assert_eq!(r.variant, Variant::Slow);
        assert_eq!(r.image_url, "https://img.example/jab2s.gif");
    }
}
