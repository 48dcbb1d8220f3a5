use crate::ports::{GeoResolution, GeoResolver};
use crate::services::PlaceQuery;
use dnstoys_domain::{DomainError, GeoMatch};

/// Resolve a parsed place label.
///
/// `paris-fr` is first tried as `paris` in `FR`; that reading wins only if it
/// is an exact match inside the hinted country. Otherwise the full label is
/// resolved as a plain name, so places whose names really end in a two-letter
/// word still work.
pub(crate) fn resolve_place(
    geo: &dyn GeoResolver,
    place: &PlaceQuery,
) -> Result<GeoResolution, DomainError> {
    if let Some(hint) = &place.country_hint {
        if let Ok(res) = geo.resolve(&hint.name, Some(&hint.country_code)) {
            if res.matched == GeoMatch::Exact
                && res
                    .location
                    .country_code
                    .eq_ignore_ascii_case(&hint.country_code)
            {
                return Ok(res);
            }
        }
    }

    geo.resolve(&place.name, None)
}
