//! State aggregation: reduce member states to one group state.

use minipool_domain::error::MiniPoolError;
use minipool_domain::state::ElementState;
use minipool_domain::statistics::StateStatistics;

use crate::ports::ElementRef;

use super::Group;

/// Result of [`Group::aggregate_state`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateAggregation {
    /// Highest-precedence state found among the members.
    pub state: ElementState,
    /// One `"<name> is in <STATE>"` line per bucketed member, in member order.
    pub status: Vec<String>,
}

impl Group {
    /// Inspect every member once and reduce the results.
    ///
    /// Precedence is `Fault` > `Alarm` > `Moving` > `On`; with no member in
    /// any of those states the group is `On`. Members in other states take no
    /// part in the result. The per-state breakdown is kept and available via
    /// [`state_statistics`](Self::state_statistics).
    ///
    /// # Errors
    ///
    /// Returns the first member inspection error, unchanged. The previous
    /// statistics are kept in that case.
    pub fn aggregate_state(&self) -> Result<StateAggregation, MiniPoolError> {
        let members = self.members();
        let mut statistics = StateStatistics::new();
        let mut status = Vec::with_capacity(members.len());

        for member in members {
            let state = member.inspect_state()?;
            if !StateStatistics::<ElementRef>::tracks(state) {
                tracing::debug!(
                    group = %self.info.name,
                    member = %member.name(),
                    %state,
                    "member state not aggregated"
                );
                continue;
            }
            status.push(format!("{} is in {state}", member.name()));
            statistics.record(state, member);
        }

        let state = statistics.group_state();
        *self.lock_statistics() = statistics;
        Ok(StateAggregation { state, status })
    }

    /// Members per bucketed state, as of the last successful aggregation.
    #[must_use]
    pub fn state_statistics(&self) -> StateStatistics<ElementRef> {
        self.lock_statistics().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::group::tests::group;
    use crate::ports::Element;
    use crate::testing::FakePhysical;

    fn group_with(states: &[(&str, ElementState)]) -> (Group, Vec<Arc<FakePhysical>>) {
        let g = group("mg01");
        let fakes: Vec<Arc<FakePhysical>> = states
            .iter()
            .map(|(name, state)| FakePhysical::with_state(name, *state))
            .collect();
        for fake in &fakes {
            g.add_member(fake.clone().into(), None).unwrap();
        }
        (g, fakes)
    }

    #[test]
    fn should_be_moving_when_on_and_moving() {
        let (g, _) = group_with(&[("a", ElementState::On), ("b", ElementState::Moving)]);
        assert_eq!(g.aggregate_state().unwrap().state, ElementState::Moving);
    }

    #[test]
    fn should_be_alarm_when_on_alarm_and_moving() {
        let (g, _) = group_with(&[
            ("a", ElementState::On),
            ("b", ElementState::Alarm),
            ("c", ElementState::Moving),
        ]);
        assert_eq!(g.aggregate_state().unwrap().state, ElementState::Alarm);
    }

    #[test]
    fn should_be_fault_when_fault_alarm_and_moving() {
        let (g, _) = group_with(&[
            ("a", ElementState::Fault),
            ("b", ElementState::Alarm),
            ("c", ElementState::Moving),
        ]);
        assert_eq!(g.aggregate_state().unwrap().state, ElementState::Fault);
    }

    #[test]
    fn should_be_on_when_empty() {
        let g = group("mg01");
        let aggregation = g.aggregate_state().unwrap();
        assert_eq!(aggregation.state, ElementState::On);
        assert!(aggregation.status.is_empty());
    }

    #[test]
    fn should_be_on_and_silent_when_no_state_is_bucketed() {
        let (g, _) = group_with(&[("a", ElementState::Off), ("b", ElementState::Standby)]);
        let aggregation = g.aggregate_state().unwrap();
        assert_eq!(aggregation.state, ElementState::On);
        assert!(aggregation.status.is_empty());
        assert!(g.state_statistics().is_empty());
    }

    #[test]
    fn should_list_status_in_member_order() {
        let (g, _) = group_with(&[("A", ElementState::Moving), ("B", ElementState::Fault)]);
        let aggregation = g.aggregate_state().unwrap();
        assert_eq!(aggregation.state, ElementState::Fault);
        assert_eq!(aggregation.status, vec!["A is in MOVING", "B is in FAULT"]);
    }

    #[test]
    fn should_skip_unbucketed_members_in_status() {
        let (g, _) = group_with(&[
            ("A", ElementState::On),
            ("B", ElementState::Disable),
            ("C", ElementState::Alarm),
        ]);
        let aggregation = g.aggregate_state().unwrap();
        assert_eq!(aggregation.status, vec!["A is in ON", "C is in ALARM"]);
    }

    #[test]
    fn should_inspect_each_member_exactly_once() {
        let (g, fakes) = group_with(&[("a", ElementState::On), ("b", ElementState::Moving)]);
        g.aggregate_state().unwrap();
        g.aggregate_state().unwrap();
        for fake in fakes {
            assert_eq!(fake.inspections(), 2);
        }
    }

    #[test]
    fn should_store_buckets_as_statistics() {
        let (g, fakes) = group_with(&[
            ("a", ElementState::On),
            ("b", ElementState::Moving),
            ("c", ElementState::On),
        ]);
        g.aggregate_state().unwrap();

        let stats = g.state_statistics();
        let on: Vec<_> = stats.get(ElementState::On).iter().map(|m| m.id()).collect();
        assert_eq!(on, vec![fakes[0].id(), fakes[2].id()]);
        assert_eq!(stats.get(ElementState::Moving).len(), 1);
        assert!(stats.get(ElementState::Fault).is_empty());
    }

    #[test]
    fn should_overwrite_statistics_on_each_call() {
        let (g, fakes) = group_with(&[("a", ElementState::Moving)]);
        g.aggregate_state().unwrap();
        fakes[0].set_state(ElementState::On);

        g.aggregate_state().unwrap();

        let stats = g.state_statistics();
        assert!(stats.get(ElementState::Moving).is_empty());
        assert_eq!(stats.get(ElementState::On).len(), 1);
    }

    #[test]
    fn should_propagate_member_inspection_failure() {
        let (g, fakes) = group_with(&[("a", ElementState::Moving), ("b", ElementState::On)]);
        g.aggregate_state().unwrap();
        fakes[1].break_inspection();

        let result = g.aggregate_state();

        assert!(matches!(result, Err(MiniPoolError::Inspection(_))));
        assert_eq!(g.state_statistics().get(ElementState::Moving).len(), 1);
    }

    #[test]
    fn should_delegate_inspect_state_to_aggregation() {
        let (g, _) = group_with(&[("a", ElementState::Alarm)]);
        assert_eq!(g.inspect_state().unwrap(), ElementState::Alarm);
    }

    #[test]
    fn should_aggregate_nested_group_as_single_member() {
        let (inner, _) = group_with(&[("m1", ElementState::Fault)]);
        let inner = Arc::new(inner);
        let outer = group("outer");
        outer
            .add_member(FakePhysical::with_state("m2", ElementState::On).into(), None)
            .unwrap();
        outer.add_member(inner.clone().into(), None).unwrap();

        let aggregation = outer.aggregate_state().unwrap();
        assert_eq!(aggregation.state, ElementState::Fault);
        assert_eq!(aggregation.status, vec!["m2 is in ON", "mg01 is in FAULT"]);
    }
}
