//! Penalty scoring used to pick the mask pattern.
//!
//! Lower is better. The four rules follow the standard's evaluation of
//! masking results: long runs (N1), 2*2 blocks (N2), finder-like patterns (N3)
//! and imbalance of dark modules (N4).

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// Upper bound of the score for the largest symbol. Anything above it means
/// the scorer is broken.
const MAX_PENALTY: i32 = 2_568_888;

/// Calculates the penalty score of a square, row-major module grid.
pub(crate) fn penalty_score(modules: &[bool], size: i32) -> i32 {
    assert_eq!(modules.len(), (size * size) as usize);
    let at = |x: i32, y: i32| modules[(y * size + x) as usize];
    let mut result: i32 = 0;

    // Adjacent modules in row having same color, and finder-like patterns
    for y in 0..size {
        result += line_penalty(size, |x| at(x, y));
    }
    // Adjacent modules in column having same color, and finder-like patterns
    for x in 0..size {
        result += line_penalty(size, |y| at(x, y));
    }

    // 2*2 blocks of modules having same color
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let color = at(x, y);
            if color == at(x + 1, y) && color == at(x, y + 1) && color == at(x + 1, y + 1) {
                result += PENALTY_N2;
            }
        }
    }

    // Balance of dark and light modules
    result += balance_steps(modules) * PENALTY_N4;
    assert!((0..=MAX_PENALTY).contains(&result), "penalty {result} out of bounds");
    result
}

/// N1 and N3 contributions of one row or column.
fn line_penalty(size: i32, module: impl Fn(i32) -> bool) -> i32 {
    let mut result = 0;
    let mut runcolor = false;
    let mut runlen: i32 = 0;
    let mut runhistory = FinderPenalty::new(size);
    for i in 0..size {
        let color = module(i);
        if color == runcolor {
            runlen += 1;
            if runlen == 5 {
                result += PENALTY_N1;
            } else if runlen > 5 {
                result += 1;
            }
        } else {
            runhistory.add_history(runlen);
            if !runcolor {
                result += runhistory.count_patterns() * PENALTY_N3;
            }
            runcolor = color;
            runlen = 1;
        }
    }
    result + runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3
}

/// Number of 5% steps by which the dark ratio deviates from 50%, minus one,
/// i.e. the smallest k such that (45-5k)% <= dark/total <= (55+5k)%.
fn balance_steps(modules: &[bool]) -> i32 {
    let dark = modules.iter().filter(|&&m| m).count() as i32;
    let total = modules.len() as i32;
    let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
    debug_assert!((0..=9).contains(&k));
    k
}

/// Run-length history of one line, newest run first, used to find
/// 1:1:3:1:1 dark-light patterns with a light margin of 4 on either side.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: i32) -> Self {
        Self {
            qr_size: size,
            run_history: [0; 7],
        }
    }

    /// Pushes the given run length to the front and drops the last value.
    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size; // Add light border to initial run
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    /// Can only be called immediately after a light run is added, and returns
    /// either 0, 1, or 2.
    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        debug_assert!(n <= self.qr_size * 3);
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    /// Must be called at the end of a line (row or column) of modules.
    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            // Terminate dark run
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size; // Add light border to final run
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}
