//! Tab Gate
//!
//! A pure mapping from pipeline stage to the set of UI sections that are
//! unlocked. The gate is monotonic within a run: sections only accumulate as
//! the chain advances, and a failed run collapses back to the overview.

use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A navigable section of the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tab {
    Overview,
    Curriculum,
    Content,
    Assessment,
    Feedback,
    Tutoring,
    Progress,
}

/// Computes the sections unlocked at `stage`.
///
/// `Overview` is always available. The curriculum view opens once curriculum
/// data exists (the chain has moved on to content generation), content and
/// tutoring open once all module content is collected, the assessment opens
/// once the whole package is ready, and feedback plus progress open once
/// feedback has been computed.
pub fn unlocked_tabs(stage: Stage) -> BTreeSet<Tab> {
    let mut tabs = BTreeSet::from([Tab::Overview]);
    if matches!(stage, Stage::Idle | Stage::Curriculum | Stage::Failed) {
        return tabs;
    }
    tabs.insert(Tab::Curriculum);
    if stage == Stage::Content {
        return tabs;
    }
    tabs.insert(Tab::Content);
    tabs.insert(Tab::Tutoring);
    if stage == Stage::Assessment {
        return tabs;
    }
    tabs.insert(Tab::Assessment);
    if stage == Stage::Ready {
        return tabs;
    }
    tabs.insert(Tab::Feedback);
    tabs.insert(Tab::Progress);
    tabs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_unlocks_only_the_overview() {
        assert_eq!(unlocked_tabs(Stage::Idle), BTreeSet::from([Tab::Overview]));
        assert_eq!(
            unlocked_tabs(Stage::Curriculum),
            BTreeSet::from([Tab::Overview])
        );
    }

    #[test]
    fn sections_accumulate_along_the_chain() {
        assert_eq!(
            unlocked_tabs(Stage::Content),
            BTreeSet::from([Tab::Overview, Tab::Curriculum])
        );
        assert_eq!(
            unlocked_tabs(Stage::Assessment),
            BTreeSet::from([Tab::Overview, Tab::Curriculum, Tab::Content, Tab::Tutoring])
        );
        assert_eq!(
            unlocked_tabs(Stage::Ready),
            BTreeSet::from([
                Tab::Overview,
                Tab::Curriculum,
                Tab::Content,
                Tab::Tutoring,
                Tab::Assessment
            ])
        );
        assert_eq!(
            unlocked_tabs(Stage::Feedback),
            BTreeSet::from([
                Tab::Overview,
                Tab::Curriculum,
                Tab::Content,
                Tab::Tutoring,
                Tab::Assessment,
                Tab::Feedback,
                Tab::Progress
            ])
        );
    }

    #[test]
    fn gate_is_monotonic_on_the_main_chain() {
        let chain = [
            Stage::Idle,
            Stage::Curriculum,
            Stage::Content,
            Stage::Assessment,
            Stage::Ready,
            Stage::Feedback,
        ];
        for pair in chain.windows(2) {
            let earlier = unlocked_tabs(pair[0]);
            let later = unlocked_tabs(pair[1]);
            assert!(
                earlier.is_subset(&later),
                "{:?} -> {:?} lost sections",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn failure_collapses_to_the_overview() {
        assert_eq!(
            unlocked_tabs(Stage::Failed),
            BTreeSet::from([Tab::Overview])
        );
    }
}
