//! Fixed categorical color schemes.

use pulse_core::Color;

/// Ordered list of colors, cycled when there are more categories than entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette(&'static [u32]);

impl Palette {
    /// Tableau 10
    pub const TABLEAU10: Palette = Palette(&[
        0x4e79a7, 0xf28e2c, 0xe15759, 0x76b7b2, 0x59a14f, 0xedc949, 0xaf7aa1, 0xff9da7,
        0x9c755f, 0xbab0ab,
    ]);

    /// Category 10
    pub const CATEGORY10: Palette = Palette(&[
        0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f,
        0xbcbd22, 0x17becf,
    ]);

    /// Depression, anxiety, panic
    pub const CONDITIONS: Palette = Palette(&[0xe41a1c, 0x377eb8, 0xffbf00]);

    /// Yes, no
    pub const YES_NO: Palette = Palette(&[0x1f77b4, 0xff7f0e]);

    pub const fn new(colors: &'static [u32]) -> Self {
        Self(colors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn color(&self, index: usize) -> Color {
        if self.0.is_empty() {
            return Color::BLACK;
        }
        Color::from_hex(self.0[index % self.0.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        let p = Palette::CONDITIONS;
        assert_eq!(p.color(3), p.color(0));
        assert_eq!(Palette::TABLEAU10.color(0).to_hex_string(), "#4e79a7");
        assert_eq!(Palette::new(&[]).color(2), Color::BLACK);
    }
}
