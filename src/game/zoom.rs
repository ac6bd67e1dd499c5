//! Table zoom control

/// Index into a fixed list of zoom factors
#[derive(Debug, Clone, PartialEq)]
pub struct Zoom {
    steps: Vec<f64>,
    index: usize,
}

impl Zoom {
    /// Start at `index`, clamped into the step list
    pub fn new(steps: Vec<f64>, index: usize) -> Self {
        let steps = if steps.is_empty() { vec![1.0] } else { steps };
        let index = index.min(steps.len() - 1);
        Zoom { steps, index }
    }

    pub fn factor(&self) -> f64 {
        self.steps[self.index]
    }

    /// Factor as a whole percentage, the form stored on the root node
    pub fn percent(&self) -> i64 {
        (self.factor() * 100.0).round() as i64
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Step in; returns false at the largest step
    pub fn zoom_in(&mut self) -> bool {
        if self.index + 1 < self.steps.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Step out; returns false at the smallest step
    pub fn zoom_out(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }
}
