/// Orders a `(lo, hi)` pair to match a scale's direction.
///
/// For a descending (inverted) scale the pair is swapped, otherwise it is
/// returned unchanged. Applying it twice with the same direction is the
/// identity.
#[must_use]
pub fn orient(scale_is_descending: bool, pair: (f64, f64)) -> (f64, f64) {
    if scale_is_descending {
        (pair.1, pair.0)
    } else {
        pair
    }
}

#[cfg(test)]
mod tests {
    use super::orient;

    #[test]
    fn ascending_scale_keeps_pair() {
        assert_eq!(orient(false, (1.0, 5.0)), (1.0, 5.0));
    }

    #[test]
    fn descending_scale_swaps_pair() {
        assert_eq!(orient(true, (4000.0, 400.0)), (400.0, 4000.0));
    }
}
