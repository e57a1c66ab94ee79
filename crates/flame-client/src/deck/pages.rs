use flame_types::models::{Candidate, CandidateProfile, Section, SectionContent, non_blank};

/// One screen of a candidate's detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Hero,
    Work,
    Education,
    Basics,
    /// `section` indexes the candidate's sorted section list; `item` is set
    /// for card sections, which get one page per item.
    Section { section: usize, item: Option<usize> },
    About,
}

fn has_work(p: &CandidateProfile) -> bool {
    non_blank(p.job_title.as_deref()).is_some() || non_blank(p.company.as_deref()).is_some()
}

fn has_education(p: &CandidateProfile) -> bool {
    non_blank(p.education.as_deref()).is_some()
}

fn has_basics(p: &CandidateProfile) -> bool {
    non_blank(p.gender.as_deref()).is_some()
        || p.age.is_some_and(|a| a > 0)
        || non_blank(p.city.as_deref()).is_some()
        || p.height_cm.is_some_and(|h| h > 0)
}

fn has_about(p: &CandidateProfile) -> bool {
    non_blank(p.bio.as_deref()).is_some() || !p.interests.is_empty()
}

/// Pages for a candidate: hero first, then whichever of work, education and
/// basics have data, then loaded sections, then about/interests last.
pub fn build_pages(candidate: &Candidate, sections: &[Section]) -> Vec<Page> {
    let p = &candidate.profile;
    let mut pages = vec![Page::Hero];

    if has_work(p) {
        pages.push(Page::Work);
    }
    if has_education(p) {
        pages.push(Page::Education);
    }
    if has_basics(p) {
        pages.push(Page::Basics);
    }

    for (idx, section) in sections.iter().enumerate() {
        match &section.content {
            SectionContent::Card { items } => {
                pages.extend((0..items.len()).map(|item| Page::Section {
                    section: idx,
                    item: Some(item),
                }));
            }
            _ => pages.push(Page::Section {
                section: idx,
                item: None,
            }),
        }
    }

    if has_about(p) {
        pages.push(Page::About);
    }
    pages
}

/// `175` -> `5'9"`.
pub fn height_label(cm: u32) -> String {
    let total_inches = (cm as f64 / 2.54).round() as u32;
    let feet = total_inches / 12;
    let inches = total_inches - feet * 12;
    format!("{feet}'{inches}\"")
}

/// Label/value rows for the basics page, skipping empty values.
pub fn basics_rows(p: &CandidateProfile) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    if let Some(age) = p.age.filter(|a| *a > 0) {
        rows.push(("Age", age.to_string()));
    }
    if let Some(gender) = non_blank(p.gender.as_deref()) {
        rows.push(("Gender", gender.to_string()));
    }
    if let Some(cm) = p.height_cm.filter(|h| *h > 0) {
        rows.push(("Height", height_label(cm)));
    }
    if let Some(city) = non_blank(p.city.as_deref()) {
        rows.push(("City", city.to_string()));
    }
    rows
}

/// "Pilot · Acme", "Pilot", or "Acme".
pub fn work_line(p: &CandidateProfile) -> Option<String> {
    match (non_blank(p.job_title.as_deref()), non_blank(p.company.as_deref())) {
        (Some(title), Some(company)) => Some(format!("{title} · {company}")),
        (Some(title), None) => Some(title.to_string()),
        (None, Some(company)) => Some(company.to_string()),
        (None, None) => None,
    }
}

/// "Ada, 29" or just the name.
pub fn headline(candidate: &Candidate) -> String {
    match candidate.profile.age.filter(|a| *a > 0) {
        Some(age) => format!("{}, {age}", candidate.display_name()),
        None => candidate.display_name(),
    }
}
