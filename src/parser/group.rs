use crate::model::TeamEntry;

/// Tag runs of teams that share one writeup.
///
/// Some documents list several rank headers back to back and write one
/// paragraph under the last of them. Every member of such a run (the empty
/// entries plus the entry holding the text) gets `grouped_with` set to the
/// other members' names. Entries are never removed or renumbered.
pub fn mark_grouped_teams(teams: &mut [TeamEntry]) {
    let mut i = 0;
    while i < teams.len() {
        if teams[i].has_content() {
            i += 1;
            continue;
        }

        let mut end = i;
        while end < teams.len() && !teams[end].has_content() {
            end += 1;
        }
        if end == teams.len() {
            break;
        }

        let group = &mut teams[i..=end];
        let names: Vec<String> = group.iter().map(|t| t.team_name.clone()).collect();
        for (idx, team) in group.iter_mut().enumerate() {
            team.grouped_with = Some(
                names
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != idx)
                    .map(|(_, n)| n.clone())
                    .collect(),
            );
        }
        i = end + 1;
    }
}
