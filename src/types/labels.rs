use strum::{EnumCount, EnumIter, EnumString, FromRepr, IntoEnumIterator, IntoStaticStr};

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, EnumCount, EnumIter, EnumString, FromRepr, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum ShutterMode {
	#[strum(serialize = "Automatic control off")]
	Off = 0,
	#[strum(serialize = "Automatic switching, timing control")]
	Timed = 1,
	#[strum(serialize = "Automatic switch, temperature difference control")]
	TemperatureDelta = 2,
	#[strum(serialize = "Full-automatic control (default)")]
	FullAuto = 3,
}

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, EnumCount, EnumIter, EnumString, FromRepr, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Palette {
	#[strum(serialize = "White Hot")]
	WhiteHot = 0,
	#[strum(serialize = "Black Hot")]
	BlackHot = 1,
	#[strum(serialize = "Fusion 1")]
	Fusion1 = 2,
	#[strum(serialize = "Rainbow")]
	Rainbow = 3,
	#[strum(serialize = "Fusion 2")]
	Fusion2 = 4,
	#[strum(serialize = "Iron Red 1")]
	IronRed1 = 5,
	#[strum(serialize = "Iron Red 2")]
	IronRed2 = 6,
	#[strum(serialize = "Dark Brown")]
	DarkBrown = 7,
	#[strum(serialize = "Color 1")]
	Color1 = 8,
	#[strum(serialize = "Color 2")]
	Color2 = 9,
	#[strum(serialize = "Ice Fire")]
	IceFire = 10,
	#[strum(serialize = "Rain")]
	Rain = 11,
	#[strum(serialize = "Green Hot")]
	GreenHot = 12,
	#[strum(serialize = "Red Hot")]
	RedHot = 13,
	#[strum(serialize = "Deep Blue")]
	DeepBlue = 14,
}

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, EnumCount, EnumIter, EnumString, FromRepr, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Mirroring {
	#[strum(serialize = "no mirroring")]
	Off = 0,
	#[strum(serialize = "central mirroring")]
	Central = 1,
	#[strum(serialize = "left/right mirroring")]
	LeftRight = 2,
	#[strum(serialize = "up/down mirroring")]
	UpDown = 3,
}

/// The label tables a command can decode through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSet {
	ShutterMode,
	Palette,
	Mirroring,
}

impl LabelSet {
	pub fn label(self, index: u8) -> Option<&'static str> {
		match self {
			LabelSet::ShutterMode => ShutterMode::from_repr(index).map(Into::into),
			LabelSet::Palette => Palette::from_repr(index).map(Into::into),
			LabelSet::Mirroring => Mirroring::from_repr(index).map(Into::into),
		}
	}

	/// Index of the label matching `text`, ignoring ASCII case.
	pub fn parse(self, text: &str) -> Option<u8> {
		match self {
			LabelSet::ShutterMode => text.parse::<ShutterMode>().ok().map(|v| v as u8),
			LabelSet::Palette => text.parse::<Palette>().ok().map(|v| v as u8),
			LabelSet::Mirroring => text.parse::<Mirroring>().ok().map(|v| v as u8),
		}
	}

	pub const fn count(self) -> usize {
		match self {
			LabelSet::ShutterMode => ShutterMode::COUNT,
			LabelSet::Palette => Palette::COUNT,
			LabelSet::Mirroring => Mirroring::COUNT,
		}
	}

	pub fn labels(self) -> Vec<&'static str> {
		match self {
			LabelSet::ShutterMode => ShutterMode::iter().map(Into::into).collect(),
			LabelSet::Palette => Palette::iter().map(Into::into).collect(),
			LabelSet::Mirroring => Mirroring::iter().map(Into::into).collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn palette_labels_in_order() {
		assert_eq!(LabelSet::Palette.count(), 15);
		assert_eq!(LabelSet::Palette.label(0), Some("White Hot"));
		assert_eq!(LabelSet::Palette.label(8), Some("Color 1"));
		assert_eq!(LabelSet::Palette.label(14), Some("Deep Blue"));
		assert_eq!(LabelSet::Palette.label(15), None);
	}

	#[test]
	fn shutter_and_mirroring_sizes() {
		assert_eq!(LabelSet::ShutterMode.count(), 4);
		assert_eq!(LabelSet::ShutterMode.label(3), Some("Full-automatic control (default)"));
		assert_eq!(LabelSet::Mirroring.count(), 4);
		assert_eq!(LabelSet::Mirroring.label(2), Some("left/right mirroring"));
		assert_eq!(LabelSet::Mirroring.label(4), None);
	}

	#[test]
	fn parse_is_case_insensitive() {
		assert_eq!(LabelSet::Palette.parse("deep blue"), Some(14));
		assert_eq!(LabelSet::Palette.parse("IRON RED 2"), Some(6));
		assert_eq!(LabelSet::Mirroring.parse("Up/Down Mirroring"), Some(3));
		assert_eq!(LabelSet::Palette.parse("Sepia"), None);
	}

	#[test]
	fn labels_list_matches_lookup() {
		for set in [LabelSet::ShutterMode, LabelSet::Palette, LabelSet::Mirroring] {
			let labels = set.labels();
			assert_eq!(labels.len(), set.count());
			for (i, label) in labels.iter().enumerate() {
				assert_eq!(set.label(i as u8), Some(*label));
				assert_eq!(set.parse(label), Some(i as u8));
			}
		}
	}
}
