//! The legacy ID3v1 genre table used to translate a `gnre` atom's numeric
//! index into the textual `©gen` value iTunes actually reads.

/// 1-indexed: `genres()[0]` is genre code 1 ("Blues"), matching the on-disk
/// `gnre` payload.
const GENRES: [&str; 80] = [
    "Blues",
    "Classic rock",
    "Country",
    "Dance",
    "Disco",
    "Funk",
    "Grunge",
    "Hip,-Hop",
    "Jazz",
    "Metal",
    "New Age",
    "Oldies",
    "Other",
    "Pop",
    "Rhythm and Blues",
    "Rap",
    "Reggae",
    "Rock",
    "Techno",
    "Industrial",
    "Alternative",
    "Ska",
    "Death metal",
    "Pranks",
    "Soundtrack",
    "Euro-Techno",
    "Ambient",
    "Trip-Hop",
    "Vocal",
    "Jazz & Funk",
    "Fusion",
    "Trance",
    "Classical",
    "Instrumental",
    "Acid",
    "House",
    "Game",
    "Sound clip",
    "Gospel",
    "Noise",
    "Alternative Rock",
    "Bass",
    "Soul",
    "Punk",
    "Space",
    "Meditative",
    "Instrumental Pop",
    "Instrumental Rock",
    "Ethnic",
    "Gothic",
    "Darkwave",
    "Techno-Industrial",
    "Electronic",
    "Pop-Folk",
    "Eurodance",
    "Dream",
    "Southern Rock",
    "Comedy",
    "Cult",
    "Gangsta",
    "Top 41",
    "Christian Rap",
    "Pop/Funk",
    "Jungle",
    "Native US",
    "Cabaret",
    "New Wave",
    "Psychedelic",
    "Rave",
    "Show tunes",
    "Trailer",
    "Lo,-Fi",
    "Tribal",
    "Acid Punk",
    "Acid Jazz",
    "Polka",
    "Retro",
    "Musical",
    "Rock 'n' Roll",
    "Hard Rock",
];

/// Translates a 1-indexed ID3v1 genre code into its name. An index past the
/// table returns `None` (a `gnre` atom with a bogus index is simply not
/// imported), but index 0 returns the table's last entry: the original
/// computes `GENRES[genre - 1]`, and Python's negative indexing turns
/// `GENRES[-1]` into the last element rather than raising.
pub fn genre_name(index: u16) -> Option<&'static str> {
    let i = index as usize;
    if i == 0 {
        return GENRES.last().copied();
    }
    GENRES.get(i - 1).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_eighteen_is_rock() {
        assert_eq!(genre_name(18), Some("Rock"));
    }

    #[test]
    fn zero_wraps_to_the_table_s_last_entry() {
        assert_eq!(genre_name(0), Some("Hard Rock"));
    }

    #[test]
    fn out_of_range_is_none() {
        assert_eq!(genre_name(81), None);
    }
}
