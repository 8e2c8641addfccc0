/// Usage code requested when none is given.
pub const DEFAULT_USAGE: &str = "ita";

/// Behind the Name usage codes and their display names.
pub const USAGE_CODES: &[(&str, &str)] = &[
    ("afk", "Afrikaans"),
    ("afr", "African"),
    ("aka", "Akan"),
    ("alb", "Albanian"),
    ("alg", "Algonquin"),
    ("ame", "Indigenous American"),
    ("amem", "New World Mythology"),
    ("amh", "Amharic"),
    ("anci", "Ancient"),
    ("apa", "Apache"),
    ("ara", "Arabic"),
    ("arm", "Armenian"),
    ("asm", "Assamese"),
    ("ast", "Asturian"),
    ("astr", "Astronomy"),
    ("aus", "Indigenous Australian"),
    ("ava", "Avar"),
    ("aym", "Aymara"),
    ("aze", "Azerbaijani"),
    ("bal", "Balinese"),
    ("bas", "Basque"),
    ("bel", "Belarusian"),
    ("bem", "Bemba"),
    ("ben", "Bengali"),
    ("ber", "Berber"),
    ("bhu", "Bhutanese"),
    ("bibl", "Biblical (All)"),
    ("bos", "Bosnian"),
    ("bre", "Breton"),
    ("bsh", "Bashkir"),
    ("bul", "Bulgarian"),
    ("bur", "Burmese"),
    ("cat", "Catalan"),
    ("cela", "Ancient Celtic"),
    ("celm", "Celtic Mythology"),
    ("cew", "Chewa"),
    ("cha", "Chamorro"),
    ("che", "Chechen"),
    ("chi", "Chinese"),
    ("chk", "Cherokee"),
    ("cht", "Choctaw"),
    ("chy", "Cheyenne"),
    ("cir", "Circassian"),
    ("cmr", "Comorian"),
    ("com", "Comanche"),
    ("coo", "Cook Islands Māori"),
    ("cop", "Coptic"),
    ("cor", "Cornish"),
    ("cre", "Cree"),
    ("cro", "Croatian"),
    ("crs", "Corsican"),
    ("cze", "Czech"),
    ("dan", "Danish"),
    ("dgs", "Dagestani"),
    ("dhi", "Dhivehi"),
    ("drg", "Dargin"),
    ("dut", "Dutch"),
    ("egya", "Ancient Egyptian"),
    ("egym", "Egyptian Mythology"),
    ("elf", "Xmas Elf"),
    ("eng", "English"),
    ("enga", "Anglo-Saxon"),
    ("esp", "Esperanto"),
    ("est", "Estonian"),
    ("eth", "Ethiopian"),
    ("ewe", "Ewe"),
    ("fae", "Faroese"),
    ("fairy", "Fairy"),
    ("fij", "Fijian"),
    ("fil", "Filipino"),
    ("fin", "Finnish"),
    ("fle", "Flemish"),
    ("fntsg", "Gluttakh"),
    ("fntsm", "Monstrall"),
    ("fntso", "Orinami"),
    ("fntsr", "Romanto"),
    ("fntss", "Simitiq"),
    ("fntst", "Tsang"),
    ("fntsx", "Xalaxxi"),
    ("fre", "French"),
    ("fri", "Frisian"),
    ("ful", "Fula"),
    ("gaa", "Ga"),
    ("gal", "Galician"),
    ("gan", "Ganda"),
    ("geo", "Georgian"),
    ("ger", "German"),
    ("gmca", "Ancient Germanic"),
    ("goth", "Goth"),
    ("gre", "Greek"),
    ("grea", "Ancient Greek"),
    ("grem", "Greek Mythology"),
    ("grn", "Greenlandic"),
    ("gua", "Guarani"),
    ("guj", "Gujarati"),
    ("hau", "Hausa"),
    ("haw", "Hawaiian"),
    ("hb", "Hillbilly"),
    ("heb", "Hebrew"),
    ("hin", "Hindi"),
    ("hippy", "Hippy"),
    ("hist", "History"),
    ("hmo", "Hmong"),
    ("hun", "Hungarian"),
    ("ibi", "Ibibio"),
    ("ice", "Icelandic"),
    ("igb", "Igbo"),
    ("ind", "Indian"),
    ("indm", "Hindu Mythology"),
    ("ing", "Ingush"),
    ("ins", "Indonesian"),
    ("inu", "Inuit"),
    ("iri", "Irish"),
    ("iro", "Iroquois"),
    ("ita", "Italian"),
    ("jap", "Japanese"),
    ("jav", "Javanese"),
    ("jer", "Jèrriais"),
    ("jew", "Jewish"),
    ("kan", "Kannada"),
    ("kaz", "Kazakh"),
    ("khm", "Khmer"),
    ("kig", "Kiga"),
    ("kik", "Kikuyu"),
    ("kk", "Kreatyve"),
    ("kon", "Kongo"),
    ("kor", "Korean"),
    ("kur", "Kurdish"),
    ("kyr", "Kyrgyz"),
    ("lao", "Lao"),
    ("lat", "Latvian"),
    ("lim", "Limburgish"),
    ("lite", "Literature"),
    ("litk", "Arthurian Romance"),
    ("lth", "Lithuanian"),
    ("luh", "Luhya"),
    ("luo", "Luo"),
    ("mac", "Macedonian"),
    ("mag", "Maguindanao"),
    ("mal", "Maltese"),
    ("man", "Manx"),
    ("mao", "Māori"),
    ("map", "Mapuche"),
    ("may", "Mayan"),
    ("mbu", "Mbundu"),
    ("medi", "Medieval"),
    ("mlm", "Malayalam"),
    ("mly", "Malay"),
    ("moh", "Mohawk"),
    ("mol", "Moldovan"),
    ("mon", "Mongolian"),
    ("morm", "Mormon"),
    ("mrt", "Marathi"),
    ("mwe", "Mwera"),
    ("myth", "Mythology"),
    ("nah", "Nahuatl"),
    ("nav", "Navajo"),
    ("nde", "Ndebele"),
    ("neaa", "Ancient Near Eastern"),
    ("neam", "Near Eastern Mythology"),
    ("nep", "Nepali"),
    ("nor", "Norwegian"),
    ("nrm", "Norman"),
    ("nuu", "Nuu-chah-nulth"),
    ("occ", "Occitan"),
    ("odi", "Odia"),
    ("oji", "Ojibwe"),
    ("one", "Oneida"),
    ("oro", "Oromo"),
    ("oss", "Ossetian"),
    ("pas", "Pashto"),
    ("pcd", "Picard"),
    ("per", "Persian"),
    ("perf", "Theatre"),
    ("pets", "Pet"),
    ("pin", "Pintupi"),
    ("pol", "Polish"),
    ("popu", "Popular Culture"),
    ("por", "Portuguese"),
    ("pow", "Powhatan"),
    ("pun", "Punjabi"),
    ("que", "Quechua"),
    ("rap", "Rapa Nui"),
    ("rmn", "Romanian"),
    ("roma", "Ancient Roman"),
    ("romm", "Roman Mythology"),
    ("rus", "Russian"),
    ("sam", "Sami"),
    ("sar", "Sardinian"),
    ("sax", "Low German"),
    ("scaa", "Ancient Scandinavian"),
    ("scam", "Norse Mythology"),
    ("sco", "Scottish"),
    ("sct", "Scots"),
    ("sen", "Seneca"),
    ("ser", "Serbian"),
    ("sha", "Shawnee"),
    ("sho", "Shona"),
    ("sic", "Sicilian"),
    ("sik", "Siksika"),
    ("sin", "Sinhalese"),
    ("sio", "Sioux"),
    ("sla", "Slavic"),
    ("slam", "Slavic Mythology"),
    ("slk", "Slovak"),
    ("sln", "Slovene"),
    ("smn", "Samoan"),
    ("som", "Somali"),
    ("sor", "Sorbian"),
    ("sot", "Sotho"),
    ("spa", "Spanish"),
    ("sun", "Sundanese"),
    ("swa", "Swahili"),
    ("swe", "Swedish"),
    ("swz", "Swazi"),
    ("tag", "Tagalog"),
    ("tah", "Tahitian"),
    ("taj", "Tajik"),
    ("tam", "Tamil"),
    ("tat", "Tatar"),
    ("tau", "Tausug"),
    ("tel", "Telugu"),
    ("tha", "Thai"),
    ("theo", "Theology"),
    ("tib", "Tibetan"),
    ("tig", "Tigrinya"),
    ("tkm", "Turkmen"),
    ("tng", "Tonga"),
    ("ton", "Tongan"),
    ("too", "Tooro"),
    ("trans", "Transformer"),
    ("tsw", "Tswana"),
    ("tua", "Tuareg"),
    ("tum", "Tumbuka"),
    ("tup", "Tupi"),
    ("tur", "Turkish"),
    ("ukr", "Ukrainian"),
    ("urd", "Urdu"),
    ("urh", "Urhobo"),
    ("usa", "American"),
    ("uyg", "Uyghur"),
    ("uzb", "Uzbek"),
    ("vari", "Various"),
    ("vie", "Vietnamese"),
    ("wel", "Welsh"),
    ("witch", "Witch"),
    ("wln", "Walloon"),
    ("wrest", "Wrestler"),
    ("xho", "Xhosa"),
    ("yao", "Yao"),
    ("yol", "Yolngu"),
    ("yor", "Yoruba"),
    ("zap", "Zapotec"),
    ("zul", "Zulu"),
];

/// Display name for a usage code, case-insensitively.
pub fn usage_name(code: &str) -> Option<&'static str> {
    USAGE_CODES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Display name for `code`, falling back to the code upper-cased.
pub fn usage_label(code: &str) -> String {
    usage_name(code).map_or_else(|| code.to_uppercase(), str::to_string)
}
