// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static routing table: (intent, org size, action) to team, priority and SLA.
//!
//! A combination missing from the table is an internal inconsistency and is
//! reported, never defaulted.

use switchboard_core::{
    Intent, OrgSize, Priority, RecommendedAction, RoutingDecision, SwitchboardError, Team,
};
use tracing::error;

/// One row of the routing table. `org_size: None` matches any size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub intent: Intent,
    pub org_size: Option<OrgSize>,
    pub action: RecommendedAction,
    pub routing: RoutingDecision,
}

const fn row(
    intent: Intent,
    org_size: Option<OrgSize>,
    action: RecommendedAction,
    team: Team,
    priority: Priority,
    sla_hours: u32,
) -> Route {
    Route {
        intent,
        org_size,
        action,
        routing: RoutingDecision {
            team,
            priority,
            sla_hours,
        },
    }
}

pub const ROUTES: &[Route] = &[
    row(
        Intent::Expansion,
        Some(OrgSize::SmallClinic),
        RecommendedAction::AutoSoftsell,
        Team::ExpansionAuto,
        Priority::Medium,
        24,
    ),
    row(
        Intent::Expansion,
        Some(OrgSize::Enterprise),
        RecommendedAction::SalesHandoff,
        Team::EnterpriseSales,
        Priority::High,
        4,
    ),
    row(
        Intent::Training,
        None,
        RecommendedAction::SendTutorial,
        Team::SupportL1,
        Priority::Low,
        48,
    ),
    row(
        Intent::Bug,
        None,
        RecommendedAction::EscalateTech,
        Team::SupportTech,
        Priority::High,
        2,
    ),
    row(
        Intent::Reonboarding,
        None,
        RecommendedAction::ScheduleReonboarding,
        Team::CustomerSuccess,
        Priority::Medium,
        24,
    ),
    row(
        Intent::General,
        None,
        RecommendedAction::StandardReply,
        Team::SupportL1,
        Priority::Low,
        48,
    ),
];

/// Looks up the routing for a resolved decision.
pub fn route(
    intent: Intent,
    action: RecommendedAction,
    org_size: OrgSize,
) -> Result<RoutingDecision, SwitchboardError> {
    ROUTES
        .iter()
        .find(|r| {
            r.intent == intent
                && r.action == action
                && r.org_size.is_none_or(|size| size == org_size)
        })
        .map(|r| r.routing)
        .ok_or_else(|| {
            error!(
                intent = %intent,
                action = %action,
                org_size = %org_size,
                "no route for resolved decision"
            );
            SwitchboardError::Internal(format!(
                "no route for intent `{intent}` with action `{action}` ({org_size})"
            ))
        })
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;
    use switchboard_core::ErrorKind;

    use super::*;
    use crate::resolve::action_for;

    #[test]
    fn expansion_small_clinic_goes_to_expansion_auto() {
        let routing = route(
            Intent::Expansion,
            RecommendedAction::AutoSoftsell,
            OrgSize::SmallClinic,
        )
        .unwrap();
        assert_eq!(routing.team, Team::ExpansionAuto);
        assert_eq!(routing.priority, Priority::Medium);
        assert_eq!(routing.sla_hours, 24);
    }

    #[test]
    fn expansion_enterprise_goes_to_sales() {
        let routing = route(
            Intent::Expansion,
            RecommendedAction::SalesHandoff,
            OrgSize::Enterprise,
        )
        .unwrap();
        assert_eq!(routing.team, Team::EnterpriseSales);
        assert_eq!(routing.priority, Priority::High);
        assert_eq!(routing.sla_hours, 4);
    }

    #[test]
    fn bug_is_urgent_regardless_of_size() {
        for org in OrgSize::iter() {
            let routing = route(Intent::Bug, RecommendedAction::EscalateTech, org).unwrap();
            assert_eq!(routing.team, Team::SupportTech);
            assert_eq!(routing.priority, Priority::High);
            assert_eq!(routing.sla_hours, 2);
        }
    }

    #[test]
    fn remaining_rows() {
        let training = route(Intent::Training, RecommendedAction::SendTutorial, OrgSize::Enterprise).unwrap();
        assert_eq!((training.team, training.priority, training.sla_hours), (Team::SupportL1, Priority::Low, 48));

        let reonboarding = route(
            Intent::Reonboarding,
            RecommendedAction::ScheduleReonboarding,
            OrgSize::SmallClinic,
        )
        .unwrap();
        assert_eq!(
            (reonboarding.team, reonboarding.priority, reonboarding.sla_hours),
            (Team::CustomerSuccess, Priority::Medium, 24)
        );

        let general = route(Intent::General, RecommendedAction::StandardReply, OrgSize::SmallClinic).unwrap();
        assert_eq!((general.team, general.priority, general.sla_hours), (Team::SupportL1, Priority::Low, 48));
    }

    #[test]
    #[tracing_test::traced_test]
    fn unknown_combination_is_internal_error() {
        let err = route(
            Intent::Bug,
            RecommendedAction::AutoSoftsell,
            OrgSize::SmallClinic,
        )
        .unwrap_err();
        assert_eq!(err.to_record().kind, ErrorKind::Internal);
        assert!(logs_contain("no route for resolved decision"));

        let err = route(
            Intent::Expansion,
            RecommendedAction::SalesHandoff,
            OrgSize::SmallClinic,
        )
        .unwrap_err();
        assert!(matches!(err, SwitchboardError::Internal(_)));
    }

    #[test]
    fn every_resolvable_decision_has_a_route() {
        for intent in Intent::iter() {
            for org in OrgSize::iter() {
                let routing = route(intent, action_for(intent, org), org).unwrap();
                assert!([2, 4, 24, 48].contains(&routing.sla_hours));
            }
        }
    }
}
