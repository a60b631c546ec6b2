/// Allows for inserting into a `ReserveVec` at a specific position.
#[derive(Debug)]
pub struct ReservePos(usize);

#[derive(Debug)]
enum VecItem<T> {
    Value(T),
    Marker,
}

/// A vector wrapper enabling reserving positions in the vector.
///
/// Used to keep a parent token ahead of the tokens produced while parsing
/// its children.
#[derive(Debug)]
pub struct ReserveVec<T> {
    vec: Vec<VecItem<T>>,
}

impl<T> ReserveVec<T> {
    pub fn new() -> ReserveVec<T> {
        ReserveVec { vec: Vec::new() }
    }

    /// Number of values and reservations.
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    /// Identical to a regular vector push.
    pub fn push(&mut self, value: T) {
        self.vec.push(VecItem::Value(value));
    }

    /// Reserve the next position in the vector.
    pub fn reserve_next(&mut self) -> ReservePos {
        let idx = self.vec.len();
        self.vec.push(VecItem::Marker);
        ReservePos(idx)
    }

    /// Insert a value at a previously reserved position.
    pub fn insert_at_reserved(&mut self, pos: ReservePos, value: T) {
        self.vec[pos.0] = VecItem::Value(value);
    }

    /// Drop everything, values and reservations, from `len` onwards.
    pub fn truncate(&mut self, len: usize) {
        self.vec.truncate(len);
    }
}

impl<T> Default for ReserveVec<T> {
    fn default() -> Self {
        ReserveVec::new()
    }
}

impl<T> From<ReserveVec<T>> for Vec<T> {
    fn from(r: ReserveVec<T>) -> Vec<T> {
        r.vec
            .into_iter()
            .filter_map(|v| match v {
                VecItem::Value(v) => Some(v),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_reservations() {
        let mut r = ReserveVec::new();
        r.push(1);
        r.push(2);
        r.push(3);
        let v: Vec<_> = r.into();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn reservation_at_beginning() {
        let mut r = ReserveVec::new();
        let pos = r.reserve_next();
        r.push(1);
        r.push(2);
        r.insert_at_reserved(pos, 3);
        let v: Vec<_> = r.into();
        assert_eq!(v, vec![3, 1, 2]);
    }

    #[test]
    fn unfilled_reservations_dropped() {
        let mut r = ReserveVec::new();
        r.push(1);
        let _ = r.reserve_next();
        r.push(2);
        let v: Vec<_> = r.into();
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn truncate_discards_reservations() {
        let mut r = ReserveVec::new();
        r.push(1);
        let len = r.len();
        let pos = r.reserve_next();
        r.push(2);
        r.insert_at_reserved(pos, 3);
        r.truncate(len);
        r.push(4);
        let v: Vec<_> = r.into();
        assert_eq!(v, vec![1, 4]);
    }
}
