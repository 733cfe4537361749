use crate::cp::model::CpModel;
use bit_vec::BitVec;

/// Finite domains of every model variable with an undo trail.
///
/// Value `v` of variable `x` lives at bit `v - lb[x]`. Every removal is pushed
/// onto the trail so that [`Domains::restore`] can put back everything pruned
/// since a [`Domains::checkpoint`].
#[derive(Debug, Clone)]
pub struct Domains {
    lb: Vec<i64>,
    bits: Vec<BitVec>,
    sizes: Vec<usize>,
    trail: Vec<(usize, usize)>,
}

impl Domains {
    #[must_use]
    pub fn new(model: &CpModel) -> Self {
        let mut lb = Vec::with_capacity(model.num_vars());
        let mut bits = Vec::with_capacity(model.num_vars());
        let mut sizes = Vec::with_capacity(model.num_vars());

        for (_, decl) in model.vars() {
            let width = usize::try_from(decl.ub - decl.lb + 1).unwrap_or(0);
            lb.push(decl.lb);
            bits.push(BitVec::from_elem(width, true));
            sizes.push(width);
        }

        Self {
            lb,
            bits,
            sizes,
            trail: Vec::new(),
        }
    }

    fn slot(&self, var: usize, value: i64) -> Option<usize> {
        usize::try_from(value - self.lb[var])
            .ok()
            .filter(|&i| i < self.bits[var].len())
    }

    #[must_use]
    pub fn contains(&self, var: usize, value: i64) -> bool {
        self.slot(var, value)
            .is_some_and(|i| self.bits[var].get(i).unwrap_or(false))
    }

    /// Removes `value` from `var`. Returns whether it was present.
    pub fn remove(&mut self, var: usize, value: i64) -> bool {
        let Some(i) = self.slot(var, value) else {
            return false;
        };
        if !self.bits[var].get(i).unwrap_or(false) {
            return false;
        }
        self.bits[var].set(i, false);
        self.sizes[var] -= 1;
        self.trail.push((var, i));
        true
    }

    #[must_use]
    pub fn size(&self, var: usize) -> usize {
        self.sizes[var]
    }

    #[must_use]
    pub fn any_empty(&self) -> bool {
        self.sizes.contains(&0)
    }

    /// Remaining values of `var` in increasing order.
    pub fn values(&self, var: usize) -> impl Iterator<Item = i64> + '_ {
        let lb = self.lb[var];
        self.bits[var]
            .iter()
            .enumerate()
            .filter(|&(_, present)| present)
            .map(move |(i, _)| lb + i as i64)
    }

    #[must_use]
    pub fn checkpoint(&self) -> usize {
        self.trail.len()
    }

    /// Undoes every removal made after `mark`.
    pub fn restore(&mut self, mark: usize) {
        for (var, i) in self.trail.drain(mark..) {
            self.bits[var].set(i, true);
            self.sizes[var] += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains() -> Domains {
        let mut model = CpModel::new();
        model.new_int_var(0, 3, "a");
        model.new_int_var(-2, 2, "b");
        Domains::new(&model)
    }

    #[test]
    fn test_remove_and_restore() {
        let mut d = domains();
        assert_eq!(d.size(1), 5);

        let mark = d.checkpoint();
        assert!(d.remove(1, -2));
        assert!(!d.remove(1, -2));
        assert!(!d.remove(1, 7));
        assert!(d.remove(1, 2));
        assert_eq!(d.values(1).collect::<Vec<_>>(), vec![-1, 0, 1]);
        assert!(!d.contains(1, -2));

        d.restore(mark);
        assert_eq!(d.size(1), 5);
        assert!(d.contains(1, -2));
    }

    #[test]
    fn test_empty_range() {
        let mut model = CpModel::new();
        model.new_int_var(3, 1, "empty");
        let d = Domains::new(&model);
        assert!(d.any_empty());
        assert_eq!(d.values(0).count(), 0);
    }
}
