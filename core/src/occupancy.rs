//! Stall occupancy rules.
//!
//! # Design
//! A placement has one source of truth: `horse.stallId`, written only through
//! `PUT /horses/:id/assign-stall` and `/remove-stall`. The `stall.horse`
//! field is a denormalized copy. `check_assignment` refuses placements the
//! backend would reject anyway, and `reconcile_occupancy` reports where the
//! two views of the same placement disagree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::types::{Horse, Stall, StallStatus};

/// Validate placing `horse` in `stall`.
///
/// Re-assigning a horse to the stall it already occupies is accepted.
pub fn check_assignment(horse: &Horse, stall: &Stall) -> Result<(), ApiError> {
    if horse.haras_id != stall.haras_id {
        return Err(ApiError::Conflict(format!(
            "{} and {} belong to different farms",
            horse.name,
            stall.label()
        )));
    }
    if horse.stall_id == Some(stall.id) {
        return Ok(());
    }
    if !horse.status.is_on_farm() {
        return Err(ApiError::Conflict(format!(
            "{} is no longer on the farm",
            horse.name
        )));
    }
    if stall.capacity == 0 {
        return Err(ApiError::Conflict(format!("{} has no capacity", stall.label())));
    }
    if stall.status == StallStatus::Maintenance {
        return Err(ApiError::Conflict(format!(
            "{} is under maintenance",
            stall.label()
        )));
    }
    match &stall.horse {
        Some(occupant) if occupant.id != horse.id => Err(ApiError::Conflict(format!(
            "{} is occupied by {}",
            stall.label(),
            occupant.name
        ))),
        None if stall.status == StallStatus::Occupied => Err(ApiError::Conflict(format!(
            "{} is marked occupied",
            stall.label()
        ))),
        _ => Ok(()),
    }
}

/// One disagreement between `horse.stallId` and `stall.horse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OccupancyMismatch {
    /// The horse points at a stall that is not in the list.
    UnknownStall { horse_id: Uuid, stall_id: Uuid },
    /// The horse points at a stall whose occupant is someone else, or nobody.
    StallDisagrees {
        horse_id: Uuid,
        stall_id: Uuid,
        occupant_id: Option<Uuid>,
    },
    /// The stall lists an occupant that does not point back at it.
    OccupantDisagrees { stall_id: Uuid, occupant_id: Uuid },
    /// More than one horse points at the same stall.
    SharedStall { stall_id: Uuid, horse_ids: Vec<Uuid> },
}

/// Compare both sides of every placement in one farm.
///
/// Occupants that are not in `horses` are skipped, since the list may be a
/// filtered view.
pub fn reconcile_occupancy(horses: &[Horse], stalls: &[Stall]) -> Vec<OccupancyMismatch> {
    let stalls_by_id: HashMap<Uuid, &Stall> = stalls.iter().map(|s| (s.id, s)).collect();
    let horses_by_id: HashMap<Uuid, &Horse> = horses.iter().map(|h| (h.id, h)).collect();
    let mut mismatches = Vec::new();
    let mut claims: HashMap<Uuid, Vec<Uuid>> = HashMap::new();

    for horse in horses {
        let Some(stall_id) = horse.stall_id else {
            continue;
        };
        claims.entry(stall_id).or_default().push(horse.id);
        match stalls_by_id.get(&stall_id) {
            None => mismatches.push(OccupancyMismatch::UnknownStall {
                horse_id: horse.id,
                stall_id,
            }),
            Some(stall) if stall.occupant_id() != Some(horse.id) => {
                mismatches.push(OccupancyMismatch::StallDisagrees {
                    horse_id: horse.id,
                    stall_id,
                    occupant_id: stall.occupant_id(),
                })
            }
            Some(_) => {}
        }
    }

    for stall in stalls {
        let Some(occupant_id) = stall.occupant_id() else {
            continue;
        };
        if let Some(horse) = horses_by_id.get(&occupant_id) {
            if horse.stall_id != Some(stall.id) {
                mismatches.push(OccupancyMismatch::OccupantDisagrees {
                    stall_id: stall.id,
                    occupant_id,
                });
            }
        }
    }

    let mut shared: Vec<_> = claims
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .collect();
    shared.sort_by_key(|(stall_id, _)| *stall_id);
    mismatches.extend(
        shared
            .into_iter()
            .map(|(stall_id, horse_ids)| OccupancyMismatch::SharedStall { stall_id, horse_ids }),
    );
    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Gender, HorseStatus, StallOccupant, StallType};
    use chrono::NaiveDate;

    fn farm() -> Uuid {
        Uuid::from_u128(0xaa)
    }

    fn horse(n: u128, stall_id: Option<Uuid>) -> Horse {
        Horse {
            id: Uuid::from_u128(n),
            haras_id: farm(),
            name: format!("Cavalo {n}"),
            breed: "Quarto de Milha".to_string(),
            gender: Gender::Male,
            birth_date: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
            color: "Alazão".to_string(),
            status: HorseStatus::Active,
            stall_id,
            breeding_role: None,
            weight: None,
            height: None,
            registration: None,
            microchip: None,
            father: None,
            mother: None,
            offspring: Vec::new(),
            achievements: Vec::new(),
            acquisition_date: None,
            acquisition_value: None,
            current_value: None,
            notes: None,
            photos: Vec::new(),
        }
    }

    fn stall(n: u128, occupant: Option<&Horse>) -> Stall {
        Stall {
            id: Uuid::from_u128(0x1000 + n),
            haras_id: farm(),
            number: n.to_string(),
            name: None,
            capacity: 1,
            status: if occupant.is_some() {
                StallStatus::Occupied
            } else {
                StallStatus::Available
            },
            stall_type: StallType::Individual,
            dimensions: None,
            horse: occupant.map(|h| StallOccupant {
                id: h.id,
                name: h.name.clone(),
                breed: None,
            }),
        }
    }

    #[test]
    fn empty_stall_accepts_horse() {
        assert!(check_assignment(&horse(1, None), &stall(1, None)).is_ok());
    }

    #[test]
    fn occupied_stall_rejects_other_horse() {
        let resident = horse(1, None);
        let s = stall(1, Some(&resident));
        let err = check_assignment(&horse(2, None), &s).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m.contains("occupied by Cavalo 1")));
    }

    #[test]
    fn reassigning_current_occupant_is_accepted() {
        let s = stall(1, None);
        let mut resident = horse(1, Some(s.id));
        let s = stall(1, Some(&resident));
        assert!(check_assignment(&resident, &s).is_ok());
        resident.stall_id = None;
        assert!(check_assignment(&resident, &s).is_ok());
    }

    #[test]
    fn maintenance_and_zero_capacity_are_rejected() {
        let mut s = stall(1, None);
        s.status = StallStatus::Maintenance;
        assert!(check_assignment(&horse(1, None), &s).is_err());

        let mut s = stall(2, None);
        s.capacity = 0;
        assert!(check_assignment(&horse(1, None), &s).is_err());
    }

    #[test]
    fn status_occupied_without_occupant_is_rejected() {
        let mut s = stall(1, None);
        s.status = StallStatus::Occupied;
        assert!(check_assignment(&horse(1, None), &s).is_err());
    }

    #[test]
    fn sold_horse_and_other_farm_are_rejected() {
        let mut h = horse(1, None);
        h.status = HorseStatus::Sold;
        assert!(check_assignment(&h, &stall(1, None)).is_err());

        let mut s = stall(1, None);
        s.haras_id = Uuid::from_u128(0xbb);
        assert!(check_assignment(&horse(1, None), &s).is_err());
    }

    #[test]
    fn consistent_placements_report_nothing() {
        let s1 = stall(1, None);
        let h1 = horse(1, Some(s1.id));
        let s1 = stall(1, Some(&h1));
        let h2 = horse(2, None);
        let s2 = stall(2, None);
        assert!(reconcile_occupancy(&[h1, h2], &[s1, s2]).is_empty());
    }

    #[test]
    fn detects_every_kind_of_mismatch() {
        let s1 = stall(1, None);
        let ghost = Uuid::from_u128(0x9999);

        let h1 = horse(1, Some(s1.id));
        let h2 = horse(2, Some(s1.id));
        let h3 = horse(3, Some(ghost));
        let h4 = horse(4, None);
        // stall 1 lists nobody though two horses claim it; stall 2 lists h4
        // which does not point back.
        let s2 = stall(2, Some(&h4));

        let horses = [h1.clone(), h2.clone(), h3.clone(), h4.clone()];
        let found = reconcile_occupancy(&horses, &[s1.clone(), s2.clone()]);
        assert!(found.contains(&OccupancyMismatch::StallDisagrees {
            horse_id: h1.id,
            stall_id: s1.id,
            occupant_id: None,
        }));
        assert!(found.contains(&OccupancyMismatch::UnknownStall {
            horse_id: h3.id,
            stall_id: ghost,
        }));
        assert!(found.contains(&OccupancyMismatch::OccupantDisagrees {
            stall_id: s2.id,
            occupant_id: h4.id,
        }));
        assert!(found.contains(&OccupancyMismatch::SharedStall {
            stall_id: s1.id,
            horse_ids: vec![h1.id, h2.id],
        }));
    }

    #[test]
    fn occupant_outside_the_list_is_skipped() {
        let outsider = horse(7, None);
        let s = stall(1, Some(&outsider));
        assert!(reconcile_occupancy(&[], &[s]).is_empty());
    }

    #[test]
    fn mismatch_serializes_with_kind_tag() {
        let m = OccupancyMismatch::UnknownStall {
            horse_id: Uuid::nil(),
            stall_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["kind"], "unknownStall");
        assert!(json.get("horseId").is_some());
    }
}
