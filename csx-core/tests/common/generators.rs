//! Stochastic content generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use csx_core::{AtomicValue, Element, Item, Node, QName};

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

#[allow(dead_code)]
impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("CSX_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Poisson-like count (simplified)
    pub fn poisson(&mut self, lambda: f64) -> usize {
        let l = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.rng.gen::<f64>();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random local name (ASCII letter, then letters, digits, `-`, `_`)
    pub fn name(&mut self) -> String {
        let len = 1 + self.geometric(0.7);
        let mut name = String::with_capacity(len);
        name.push(char::from(self.rng.gen_range(b'a'..=b'z')));
        let chars = b"abcdefghijklmnopqrstuvwxyz0123456789-_";
        for _ in 1..len {
            name.push(char::from(chars[self.rng.gen_range(0..chars.len())]));
        }
        name
    }

    /// Random short prose
    pub fn text(&mut self) -> String {
        let words = 1 + self.geometric(0.5);
        (0..words).map(|_| self.name()).collect::<Vec<_>>().join(" ")
    }

    /// Random atomic value, never NaN so trees stay comparable.
    pub fn atomic(&mut self) -> AtomicValue {
        match self.rng.gen_range(0..4) {
            0 => AtomicValue::Boolean(self.chance(0.5)),
            1 => AtomicValue::Int(self.rng.gen_range(-9999..9999)),
            2 => AtomicValue::Double(f64::from(self.rng.gen_range(-500i32..500)) / 4.0),
            _ => AtomicValue::String(self.text()),
        }
    }

    /// Random element in no namespace: maybe an attribute, maybe some text.
    pub fn element(&mut self) -> Element {
        let mut element = Element::new(QName::local(self.name()));
        if self.chance(0.3) {
            let value = self.atomic();
            element = element.with_attribute(QName::local(self.name()), value);
        }
        if self.chance(0.5) {
            element = element.with_text(self.text());
        }
        element
    }

    /// Random root-level sibling (for context wrapping)
    pub fn sibling(&mut self) -> Item {
        match self.rng.gen_range(0..3) {
            0 => Item::Atomic(self.atomic()),
            1 => Item::Node(Node::text(self.text())),
            _ => Item::from(self.element()),
        }
    }

    /// Nest `nodes` inside a geometric number of random outer elements.
    pub fn wrap(&mut self, nodes: Vec<Node>) -> Vec<Node> {
        let depth = self.geometric(0.6);
        let mut nodes = nodes;
        for _ in 0..depth {
            let mut outer = Element::new(QName::local(self.name()));
            if self.chance(0.3) {
                outer.children.push(Node::Element(self.element()));
            }
            outer.children.extend(nodes);
            if self.chance(0.3) {
                outer.children.push(Node::text(self.text()));
            }
            nodes = vec![Node::Element(outer)];
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.name(), g2.name());
            assert_eq!(g1.geometric(0.9), g2.geometric(0.9));
            assert_eq!(g1.sibling(), g2.sibling());
        }
    }

    #[test]
    fn test_wrap_keeps_nodes() {
        let mut gen = Gen::new(7);
        for _ in 0..50 {
            let wrapped = gen.wrap(vec![Node::text("payload")]);
            assert_eq!(wrapped.len(), 1);
        }
    }
}
