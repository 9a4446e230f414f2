/// Trait for types that can be inverted.
/// For knot sequences, inverting reverses the traversal direction of the parameter domain.
pub trait Invertible: Clone {
    fn invert(&mut self);
    fn inverse(&self) -> Self {
        let mut inv = self.clone();
        inv.invert();
        inv
    }
}
