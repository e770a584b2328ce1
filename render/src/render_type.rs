//! The hierarchical render-type taxonomy: a 32-bit code
//! encoding `General x Category x Subcategory x Feature` as decimal digits.

pub type RenderType = i32;

pub const UNKNOWN: RenderType = 0;
pub const WATERWAY: RenderType = 1;
pub const PLACE_NAME: RenderType = 2;

pub const HIGHWAY: RenderType = 1000;
pub const H__MOTORWAY: RenderType = 1001;
pub const H__TRUNK: RenderType = 1002;
pub const H__PRIMARY: RenderType = 1003;
pub const H__SECONDARY: RenderType = 1004;
pub const H__TERTIARY: RenderType = 1005;
pub const H__RESIDENTIAL: RenderType = 1006;
pub const H__SERVICE: RenderType = 1007;
pub const H__TRACK: RenderType = 1008;

pub const RAILWAY: RenderType = 2000;
pub const R__MAINLINE: RenderType = 2001;
pub const R__SUBWAY: RenderType = 2002;
pub const R__LIGHT_RAIL: RenderType = 2003;
pub const R__TRAM: RenderType = 2004;
pub const R__NARROW_GAUGE: RenderType = 2005;
pub const R__MONORAIL: RenderType = 2006;
pub const R__PRESERVED: RenderType = 2007;
pub const R__MINIATURE: RenderType = 2008;
pub const R__FUNICULAR: RenderType = 2009;

pub const BORDER: RenderType = 3000;

pub const BUILDING: RenderType = 4000;

pub const LANDUSE: RenderType = 5000;
/// Subcategory grouping the "natural area" leaves.
pub const LU__NATURAL: RenderType = 5110;
pub const LU__N_FOREST: RenderType = 5111;
pub const LU__N_PLAIN: RenderType = 5112;
pub const LU__N_HILLS: RenderType = 5113;
pub const LU__N_MOUNTAINS: RenderType = 5114;
pub const LU__N_DESERT: RenderType = 5115;
pub const LU__N_WATER: RenderType = 5116;
pub const LU__LEISURE: RenderType = 5120;
pub const LU_RESIDENTIAL: RenderType = 5200;
/// Fountain variant of [`LU_RESIDENTIAL`]. Deliberately unhandled at the
/// leaf level by the tessellator — see `DESIGN.md` for why.
pub const LU_R__FOUNTAIN: RenderType = 5201;

/// `code` rounded down to its subcategory (nearest multiple of 10).
pub fn subcategory_of(code: RenderType) -> RenderType { (code / 10) * 10 }

/// `code` rounded down to its category (nearest multiple of 100).
pub fn category_of(code: RenderType) -> RenderType { (code / 100) * 100 }

/// `code` rounded down to its general class (nearest multiple of 1000).
pub fn general_of(code: RenderType) -> RenderType { (code / 1000) * 1000 }

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hierarchy_rounds_down() {
		assert_eq!(subcategory_of(LU__N_FOREST), LU__NATURAL);
		assert_eq!(category_of(LU__NATURAL), LANDUSE + 100);
		assert_eq!(general_of(LU_RESIDENTIAL), LANDUSE);
		assert_eq!(general_of(H__MOTORWAY), HIGHWAY);
	}

	#[test]
	fn fountain_falls_through_to_residential_category() {
		assert_eq!(category_of(LU_R__FOUNTAIN), LU_RESIDENTIAL);
	}
}
