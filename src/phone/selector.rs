//! Searchable country dropdown state.

use crate::countries::{self, Country};

/// Message shown in place of the list when nothing matches.
pub const NO_COUNTRIES_FOUND: &str = "No countries found";

/// Where the panel is drawn relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Below,
    Above,
}

/// Viewport-relative geometry of the trigger the panel hangs from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// Distance from the viewport top to the anchor's top edge.
    pub top: f32,
    /// Anchor height.
    pub height: f32,
    /// Viewport height.
    pub viewport_height: f32,
}

/// Result of filtering the directory with the current search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilteredCountries {
    Matches(Vec<&'static Country>),
    /// Nothing matched; render [`NO_COUNTRIES_FOUND`].
    Empty,
}

/// Dropdown over the country directory.
#[derive(Debug, Clone)]
pub struct CountrySelector {
    selected: &'static Country,
    open: bool,
    search: String,
    placement: Placement,
    panel_height: f32,
}

impl CountrySelector {
    /// Default panel height used for placement decisions.
    pub const PANEL_HEIGHT: f32 = 320.0;

    pub fn new(selected: &'static Country) -> Self {
        Self {
            selected,
            open: false,
            search: String::new(),
            placement: Placement::Below,
            panel_height: Self::PANEL_HEIGHT,
        }
    }

    pub fn selected(&self) -> &'static Country {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Open the panel and compute its placement.
    pub fn open(&mut self, anchor: Anchor) {
        self.open = true;
        self.placement = place(anchor, self.panel_height);
    }

    /// Toggle the panel from the trigger.
    pub fn toggle(&mut self, anchor: Anchor) {
        if self.open {
            self.close();
        } else {
            self.open(anchor);
        }
    }

    /// Recompute placement on scroll/resize. Ignored while closed.
    pub fn reposition(&mut self, anchor: Anchor) {
        if self.open {
            self.placement = place(anchor, self.panel_height);
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Countries matching the current search term.
    pub fn filtered(&self) -> FilteredCountries {
        let matches = countries::search(&self.search);
        if matches.is_empty() {
            FilteredCountries::Empty
        } else {
            FilteredCountries::Matches(matches)
        }
    }

    /// Pick a row. Returns the newly selected country for the owner to act on.
    pub fn select(&mut self, country: &'static Country) -> &'static Country {
        self.selected = country;
        self.close();
        country
    }

    /// Pointer-down outside both trigger and panel.
    pub fn outside_click(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.open = false;
        self.search.clear();
    }
}

/// Flip above the anchor when the panel doesn't fit below it and there is
/// more room above.
fn place(anchor: Anchor, panel_height: f32) -> Placement {
    let space_below = anchor.viewport_height - (anchor.top + anchor.height);
    let space_above = anchor.top;
    if space_below < panel_height && space_above > space_below {
        Placement::Above
    } else {
        Placement::Below
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor_at(top: f32) -> Anchor {
        Anchor {
            top,
            height: 40.0,
            viewport_height: 800.0,
        }
    }

    #[test]
    fn select_closes_and_clears_search() {
        let mut sel = CountrySelector::new(countries::default_country());
        sel.open(anchor_at(100.0));
        sel.set_search("king");
        let gb = countries::find_by_code("GB").unwrap();

        let picked = sel.select(gb);

        assert_eq!(picked.code, "GB");
        assert_eq!(sel.selected().code, "GB");
        assert!(!sel.is_open());
        assert!(sel.search_term().is_empty());
    }

    #[test]
    fn outside_click_keeps_selection() {
        let mut sel = CountrySelector::new(countries::default_country());
        sel.open(anchor_at(100.0));
        sel.set_search("us");
        sel.outside_click();

        assert!(!sel.is_open());
        assert!(sel.search_term().is_empty());
        assert_eq!(sel.selected().code, "AE");
    }

    #[test]
    fn filter_is_case_insensitive_or_semantics() {
        let mut sel = CountrySelector::new(countries::default_country());
        sel.set_search("UNITED");
        match sel.filtered() {
            FilteredCountries::Matches(list) => {
                let codes: Vec<&str> = list.iter().map(|c| c.code).collect();
                assert!(codes.contains(&"AE"));
                assert!(codes.contains(&"US"));
                assert!(codes.contains(&"GB"));
            }
            FilteredCountries::Empty => panic!("expected matches"),
        }
    }

    #[test]
    fn empty_filter_result() {
        let mut sel = CountrySelector::new(countries::default_country());
        sel.set_search("zzzz");
        assert_eq!(sel.filtered(), FilteredCountries::Empty);
    }

    #[test]
    fn flips_above_near_viewport_bottom() {
        let mut sel = CountrySelector::new(countries::default_country());
        sel.open(anchor_at(100.0));
        assert_eq!(sel.placement(), Placement::Below);

        sel.reposition(anchor_at(700.0));
        assert_eq!(sel.placement(), Placement::Above);
    }

    #[test]
    fn reposition_ignored_when_closed() {
        let mut sel = CountrySelector::new(countries::default_country());
        sel.reposition(anchor_at(700.0));
        assert_eq!(sel.placement(), Placement::Below);
    }

    #[test]
    fn toggle_opens_then_closes() {
        let mut sel = CountrySelector::new(countries::default_country());
        sel.toggle(anchor_at(0.0));
        assert!(sel.is_open());
        sel.set_search("fr");
        sel.toggle(anchor_at(0.0));
        assert!(!sel.is_open());
        assert!(sel.search_term().is_empty());
    }
}
