//! Weather-aware selection among complete exit/entrance candidates.

use super::segment::Segment;

/// A fully routed alternative.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub segments: Vec<Segment>,
    pub total: f64,
    pub outdoor: f64,
}

impl Candidate {
    pub fn new(segments: Vec<Segment>) -> Self {
        let total = segments.iter().map(Segment::distance).sum();
        let outdoor = segments
            .iter()
            .filter(|segment| segment.is_outdoor())
            .map(Segment::distance)
            .sum();
        Self {
            segments,
            total,
            outdoor,
        }
    }
}

/// The chosen candidate and whether weather changed the choice.
#[derive(Debug)]
pub(crate) struct Selection {
    pub candidate: Candidate,
    pub weather_adjusted: bool,
}

/// Running best over candidates, kept under both strict and weather-aware
/// ordering so the two choices can be compared at the end.
#[derive(Debug)]
pub(crate) struct CandidateSelector {
    bad_weather: bool,
    tolerance: f64,
    seen: usize,
    strict: Option<(usize, Candidate)>,
    sheltered: Option<(usize, Candidate)>,
}

impl CandidateSelector {
    pub fn new(bad_weather: bool, tolerance: f64) -> Self {
        Self {
            bad_weather,
            tolerance,
            seen: 0,
            strict: None,
            sheltered: None,
        }
    }

    pub fn offer(&mut self, candidate: Candidate) {
        let index = self.seen;
        self.seen += 1;

        if self.bad_weather {
            let replace = match &self.sheltered {
                Some((_, best)) => prefer_sheltered(&candidate, best, self.tolerance),
                None => true,
            };
            if replace {
                self.sheltered = Some((index, candidate.clone()));
            }
        }

        let replace = match &self.strict {
            Some((_, best)) => candidate.total < best.total,
            None => true,
        };
        if replace {
            self.strict = Some((index, candidate));
        }
    }

    pub fn finish(self) -> Option<Selection> {
        let (strict_index, strict) = self.strict?;
        match self.sheltered {
            Some((index, candidate)) => Some(Selection {
                candidate,
                weather_adjusted: index != strict_index,
            }),
            None => Some(Selection {
                candidate: strict,
                weather_adjusted: false,
            }),
        }
    }
}

/// Within the tolerance band, less outdoor exposure wins and the lower total
/// breaks ties. Outside it, the lower total wins.
fn prefer_sheltered(challenger: &Candidate, incumbent: &Candidate, tolerance: f64) -> bool {
    if within_band(challenger.total, incumbent.total, tolerance) {
        if challenger.outdoor != incumbent.outdoor {
            return challenger.outdoor < incumbent.outdoor;
        }
        return challenger.total < incumbent.total;
    }
    challenger.total < incumbent.total
}

fn within_band(a: f64, b: f64, tolerance: f64) -> bool {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    high <= low * (1.0 + tolerance)
}
