//! Bidirectional shortest edit script search.
//!
//! A front path walks from the start of both texts and a reverse path from
//! their ends, one edit distance `d` at a time. Every coordinate a path
//! passes through is recorded as a footstep; once one path steps on a
//! footstep of the other they have met and the script is rebuilt from the
//! per-depth coordinate sets of each side.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use log::debug;

use crate::config::Config;
use crate::difference::Difference;
use crate::edit_type::EditType;

type Point = (isize, isize);

/// Computes raw edit scripts for texts without a common prefix or suffix.
#[derive(Debug, Clone, Copy)]
pub struct DifferenceEngine {
    config: Config,
}

impl DifferenceEngine {
    /// Create a new engine
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Search for the shortest edit script turning `source` into `target`.
    ///
    /// Returns `None` when the configured timeout elapses or the depth budget
    /// runs out before the two paths meet. The budget only runs out for
    /// texts without a single shared char. `None` is not "no
    /// differences": the caller has to fall back to deleting `source` and
    /// inserting `target` wholesale.
    pub fn generate(&self, source: &[char], target: &[char]) -> Option<Vec<Difference>> {
        let deadline = (!self.config.timeout.is_zero()).then(|| Instant::now() + self.config.timeout);

        let n1 = source.len() as isize;
        let n2 = target.len() as isize;
        // Any script sharing at least one char is found within this depth.
        let max_d = n1 + n2 - 1;
        let offset = max_d + 1;

        let mut v1 = vec![0isize; (2 * max_d + 3) as usize];
        let mut v2 = vec![0isize; (2 * max_d + 3) as usize];
        let mut v_map1: Vec<HashSet<Point>> = Vec::new();
        let mut v_map2: Vec<HashSet<Point>> = Vec::new();
        let mut footsteps: HashMap<Point, usize> = HashMap::new();
        let mut done = false;

        // With an odd total length the front path is the one that collides.
        let front = (n1 + n2) % 2 == 1;

        for d in 0..max_d {
            if let Some(deadline) = deadline {
                if Instant::now() > deadline {
                    debug!("edit script search timed out at depth {}", d);
                    return None;
                }
            }
            let depth = d as usize;

            // Walk the front path one step.
            v_map1.push(HashSet::new());
            let mut k = -d;
            while k <= d {
                let ki = (k + offset) as usize;
                let mut x = if k == -d || (k != d && v1[ki - 1] < v1[ki + 1]) {
                    v1[ki + 1]
                } else {
                    v1[ki - 1] + 1
                };
                let mut y = x - k;
                let mut footstep = (x, y);
                if front && footsteps.contains_key(&footstep) {
                    done = true;
                }
                if !front {
                    footsteps.insert(footstep, depth);
                }
                while !done && x < n1 && y < n2 && source[x as usize] == target[y as usize] {
                    x += 1;
                    y += 1;
                    footstep = (x, y);
                    if front && footsteps.contains_key(&footstep) {
                        done = true;
                    }
                    if !front {
                        footsteps.insert(footstep, depth);
                    }
                }
                v1[ki] = x;
                v_map1[depth].insert((x, y));
                if x == n1 && y == n2 {
                    return Some(path1(&v_map1, source, target));
                } else if done {
                    v_map2.truncate(footsteps[&footstep] + 1);
                    let (x, y) = (x as usize, y as usize);
                    let mut diffs = path1(&v_map1, &source[..x], &target[..y]);
                    diffs.extend(path2(&v_map2, &source[x..], &target[y..]));
                    return Some(diffs);
                }
                k += 2;
            }

            // Walk the reverse path one step.
            v_map2.push(HashSet::new());
            let mut k = -d;
            while k <= d {
                let ki = (k + offset) as usize;
                let mut x = if k == -d || (k != d && v2[ki - 1] < v2[ki + 1]) {
                    v2[ki + 1]
                } else {
                    v2[ki - 1] + 1
                };
                let mut y = x - k;
                let mut footstep = (n1 - x, n2 - y);
                if !front && footsteps.contains_key(&footstep) {
                    done = true;
                }
                if front {
                    footsteps.insert(footstep, depth);
                }
                while !done
                    && x < n1
                    && y < n2
                    && source[(n1 - x - 1) as usize] == target[(n2 - y - 1) as usize]
                {
                    x += 1;
                    y += 1;
                    footstep = (n1 - x, n2 - y);
                    if !front && footsteps.contains_key(&footstep) {
                        done = true;
                    }
                    if front {
                        footsteps.insert(footstep, depth);
                    }
                }
                v2[ki] = x;
                v_map2[depth].insert((x, y));
                if done {
                    v_map1.truncate(footsteps[&footstep] + 1);
                    let (x, y) = ((n1 - x) as usize, (n2 - y) as usize);
                    let mut diffs = path1(&v_map1, &source[..x], &target[..y]);
                    diffs.extend(path2(&v_map2, &source[x..], &target[y..]));
                    return Some(diffs);
                }
                k += 2;
            }
        }

        debug!(
            "edit script search exhausted depth {} without the paths meeting",
            max_d
        );
        None
    }
}

/// Accumulates single-char moves into runs of the same edit type.
#[derive(Default)]
struct Runs {
    runs: Vec<(EditType, Vec<char>)>,
}

impl Runs {
    fn push(&mut self, edit_type: EditType, c: char) {
        match self.runs.last_mut() {
            Some((last, chars)) if *last == edit_type => chars.push(c),
            _ => self.runs.push((edit_type, vec![c])),
        }
    }

    fn into_differences(self) -> Vec<Difference> {
        self.runs
            .into_iter()
            .map(|(edit_type, chars)| Difference::new(edit_type, chars.into_iter().collect::<String>()))
            .collect()
    }

    /// Same as `into_differences` for runs that were recorded back to front.
    fn into_reversed_differences(mut self) -> Vec<Difference> {
        self.runs.reverse();
        for (_, chars) in &mut self.runs {
            chars.reverse();
        }
        self.into_differences()
    }
}

/// Rebuild the front half of the script, walking back from the end of
/// both texts to their start.
fn path1(v_map: &[HashSet<Point>], source: &[char], target: &[char]) -> Vec<Difference> {
    let mut runs = Runs::default();
    let mut x = source.len() as isize;
    let mut y = target.len() as isize;
    for d in (0..v_map.len().saturating_sub(1)).rev() {
        loop {
            if v_map[d].contains(&(x - 1, y)) {
                x -= 1;
                runs.push(EditType::Delete, source[x as usize]);
                break;
            } else if v_map[d].contains(&(x, y - 1)) {
                y -= 1;
                runs.push(EditType::Insert, target[y as usize]);
                break;
            } else if x > 0 && y > 0 {
                x -= 1;
                y -= 1;
                runs.push(EditType::Equal, source[x as usize]);
            } else {
                break;
            }
        }
    }
    while x > 0 && y > 0 {
        x -= 1;
        y -= 1;
        runs.push(EditType::Equal, source[x as usize]);
    }
    runs.into_reversed_differences()
}

/// Rebuild the reverse half of the script. Coordinates in `v_map` count
/// from the end of the texts.
fn path2(v_map: &[HashSet<Point>], source: &[char], target: &[char]) -> Vec<Difference> {
    let n1 = source.len() as isize;
    let n2 = target.len() as isize;
    let mut runs = Runs::default();
    let mut x = n1;
    let mut y = n2;
    for d in (0..v_map.len().saturating_sub(1)).rev() {
        loop {
            if v_map[d].contains(&(x - 1, y)) {
                x -= 1;
                runs.push(EditType::Delete, source[(n1 - x - 1) as usize]);
                break;
            } else if v_map[d].contains(&(x, y - 1)) {
                y -= 1;
                runs.push(EditType::Insert, target[(n2 - y - 1) as usize]);
                break;
            } else if x > 0 && y > 0 {
                x -= 1;
                y -= 1;
                runs.push(EditType::Equal, source[(n1 - x - 1) as usize]);
            } else {
                break;
            }
        }
    }
    while x > 0 && y > 0 {
        x -= 1;
        y -= 1;
        runs.push(EditType::Equal, source[(n1 - x - 1) as usize]);
    }
    runs.into_differences()
}
