// Listing-card text heuristic

/// Title, location and team read off a listing card's rendered text.
///
/// This is positional, not structural: line 0 is taken as the title, line 1 as
/// the location and line 2 as the team. It has not been checked against any
/// ground truth and breaks silently when a site reorders its card markup, so
/// treat the fields as best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardText {
    pub title: String,
    pub location: String,
    pub team: String,
}

impl CardText {
    pub fn parse(text: &str) -> Self {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let mut next = || lines.next().unwrap_or_default().to_string();

        let title = next();
        let location = next();
        let team = next();
        Self {
            title,
            location,
            team,
        }
    }
}
