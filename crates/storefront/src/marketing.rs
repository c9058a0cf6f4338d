//! Marketing content for the landing page.

use serde::Serialize;

// =============================================================================
// Hero
// =============================================================================

/// Call-to-action button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallToAction {
    pub label: String,
    pub href: String,
}

/// Static hero banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroBanner {
    pub eyebrow: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub primary: CallToAction,
    pub secondary: Option<CallToAction>,
}

impl Default for HeroBanner {
    fn default() -> Self {
        Self {
            eyebrow: Some("New season".to_string()),
            title: "Everything your business sells, in one place".to_string(),
            subtitle: "Set up a storefront, take payments with Razorpay, and track orders from a single dashboard."
                .to_string(),
            primary: CallToAction {
                label: "Get started".to_string(),
                href: "/register".to_string(),
            },
            secondary: Some(CallToAction {
                label: "See pricing".to_string(),
                href: "/pricing".to_string(),
            }),
        }
    }
}

// =============================================================================
// Feature carousel
// =============================================================================

/// One card in the feature carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureCard {
    pub icon: String,
    pub title: String,
    pub description: String,
}

impl FeatureCard {
    fn new(icon: &str, title: &str, description: &str) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Ordered feature cards with a current position.
///
/// Navigation wraps in both directions. An empty carousel ignores navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCarousel {
    cards: Vec<FeatureCard>,
    current: usize,
}

impl Default for FeatureCarousel {
    fn default() -> Self {
        Self::new(vec![
            FeatureCard::new(
                "storefront",
                "Your own storefront",
                "Publish a catalogue with your branding in minutes.",
            ),
            FeatureCard::new(
                "payments",
                "Built-in payments",
                "Accept UPI, cards and net banking through Razorpay.",
            ),
            FeatureCard::new(
                "orders",
                "Order tracking",
                "Follow every order from checkout to delivery.",
            ),
            FeatureCard::new(
                "analytics",
                "Sales analytics",
                "Monthly revenue and category breakdowns at a glance.",
            ),
            FeatureCard::new(
                "support",
                "Customer profiles",
                "Saved addresses and contact details for repeat buyers.",
            ),
        ])
    }
}

impl FeatureCarousel {
    #[must_use]
    pub const fn new(cards: Vec<FeatureCard>) -> Self {
        Self { cards, current: 0 }
    }

    #[must_use]
    pub fn cards(&self) -> &[FeatureCard] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current(&self) -> Option<&FeatureCard> {
        self.cards.get(self.current)
    }

    /// Advance one card, wrapping to the first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        if !self.cards.is_empty() {
            self.current = (self.current + 1) % self.cards.len();
        }
    }

    /// Go back one card, wrapping to the last.
    pub fn previous(&mut self) {
        if !self.cards.is_empty() {
            self.current = (self.current + self.cards.len() - 1) % self.cards.len();
        }
    }

    /// Jump to `index`. Returns `false` and stays put when out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.cards.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    /// Up to `n` cards starting at the current one, wrapping around.
    ///
    /// Never yields the same card twice.
    pub fn visible(&self, n: usize) -> impl Iterator<Item = &FeatureCard> {
        self.cards
            .iter()
            .cycle()
            .skip(self.current)
            .take(n.min(self.cards.len()))
    }
}
