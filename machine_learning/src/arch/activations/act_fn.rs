use super::Sigmoid;

/// The activation functions a layer can apply to its weighted sums.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActFn {
    Sigmoid(Sigmoid),
}

impl ActFn {
    pub fn sigmoid(amp: f32) -> Self {
        Self::Sigmoid(Sigmoid::new(amp))
    }

    pub fn f(&self, x: f32) -> f32 {
        match self {
            Self::Sigmoid(a) => a.f(x),
        }
    }

    pub fn df(&self, x: f32) -> f32 {
        match self {
            Self::Sigmoid(a) => a.df(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_derivative_matches_finite_difference() {
        let act = ActFn::sigmoid(2.0);
        let h = 1e-3;

        for z in [-3.0, -0.5, 0.0, 0.7, 4.0] {
            let numeric = (act.f(z + h) - act.f(z - h)) / (2.0 * h);
            assert!((numeric - act.df(z)).abs() < 1e-3, "z = {z}");
        }
    }

    #[test]
    fn sigmoid_derivative_is_finite_for_large_inputs() {
        let act = ActFn::sigmoid(1.0);
        assert!(act.df(-200.0).is_finite());
        assert!(act.df(200.0).is_finite());
        assert_eq!(act.f(0.0), 0.5);
    }
}
