//! Selection highlighting
//!
//! A bar is in the selection when its horizontal centre lies in the closed interval
//! `[low, high]`. Bars outside are dimmed, never hidden. With no selection every bar is
//! selected. Classification only reads geometry; counts are untouched.

use pulse_core::PixelRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    Selected,
    Dimmed,
}

impl Highlight {
    pub const SELECTED_OPACITY: f32 = 1.0;
    pub const DIMMED_OPACITY: f32 = 0.2;

    pub fn opacity(self) -> f32 {
        match self {
            Highlight::Selected => Self::SELECTED_OPACITY,
            Highlight::Dimmed => Self::DIMMED_OPACITY,
        }
    }
}

pub fn classify(center_x: f32, selection: Option<&PixelRange>) -> Highlight {
    match selection {
        Some(range) if !range.contains(center_x) => Highlight::Dimmed,
        _ => Highlight::Selected,
    }
}

pub fn classify_all(centers: &[f32], selection: Option<&PixelRange>) -> Vec<Highlight> {
    centers.iter().map(|&x| classify(x, selection)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive() {
        let r = PixelRange::new(10.0, 20.0).unwrap();
        assert_eq!(classify(10.0, Some(&r)), Highlight::Selected);
        assert_eq!(classify(20.0, Some(&r)), Highlight::Selected);
        assert_eq!(classify(20.01, Some(&r)), Highlight::Dimmed);
        assert_eq!(classify(-5.0, None), Highlight::Selected);
    }

    #[test]
    fn opacities() {
        assert_eq!(Highlight::Selected.opacity(), 1.0);
        assert_eq!(Highlight::Dimmed.opacity(), 0.2);
    }
}
