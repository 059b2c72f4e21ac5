use crate::db::models::{Instrument, InstrumentStatus};

/// Whether `detected` can stand in for `reference`: same type, or same name.
fn matches_reference(reference: &Instrument, detected: &Instrument) -> bool {
    let same_type = matches!(
        (reference.type_key(), detected.type_key()),
        (Some(expected), Some(found)) if expected == found
    );
    let same_name = matches!(
        (reference.name_key(), detected.name_key()),
        (Some(expected), Some(found)) if expected == found
    );
    same_type || same_name
}

/// Reconcile a detection pass against the expected composition.
///
/// Output holds one entry per reference instrument, in reference order
/// (`present` carrying the detected item, or `missing` carrying the
/// reference item), followed by every unclaimed detection as `extra` in
/// detection order. Each detection is claimed by at most one reference item;
/// the first unclaimed candidate in detection order wins.
pub fn reconcile(reference: &[Instrument], detected: &[Instrument]) -> Vec<Instrument> {
    let mut claimed = vec![false; detected.len()];
    let mut result = Vec::with_capacity(reference.len() + detected.len());

    for expected in reference {
        let candidate = detected
            .iter()
            .enumerate()
            .find(|(index, found)| !claimed[*index] && matches_reference(expected, found));

        match candidate {
            Some((index, found)) => {
                claimed[index] = true;
                result.push(found.clone().with_status(InstrumentStatus::Present));
            }
            None => {
                let mut missing = expected.clone().with_status(InstrumentStatus::Missing);
                missing.confidence = 0.0;
                missing.position = None;
                result.push(missing);
            }
        }
    }

    // Step 2: everything nobody claimed is surplus.
    result.extend(
        detected
            .iter()
            .zip(&claimed)
            .filter(|(_, is_claimed)| !**is_claimed)
            .map(|(found, _)| found.clone().with_status(InstrumentStatus::Extra)),
    );

    result
}
