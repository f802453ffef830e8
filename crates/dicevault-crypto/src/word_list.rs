//! Built-in word list for password encoding.
//!
//! Exactly 256 distinct words so each word encodes one byte of derived
//! material. Words are short, common, and unambiguous when read aloud.

/// Name of the built-in list (the default when a recipe names none).
pub(crate) const DEFAULT_WORD_LIST: &str = "EN_256";

/// The 256-entry English word list.
pub(crate) const EN_256: [&str; 256] = [
    "acid", "acorn", "actor", "alarm", "alien", "amber", "anchor", "angle", "ankle", "apple",
    "april", "arena", "arrow", "atlas", "atom", "autumn", "badge", "bagel", "bamboo", "banjo",
    "barrel", "basil", "beacon", "beaver", "bell", "bench", "berry", "bison", "blade", "blanket",
    "bloom", "bolt", "bonus", "book", "boot", "bottle", "branch", "brave", "bread", "brick",
    "bridge", "broom", "bubble", "bucket", "butter", "cabin", "cactus", "camel", "candle", "canoe",
    "canyon", "carbon", "cargo", "carrot", "castle", "cedar", "cello", "chalk", "cherry", "chess",
    "chief", "chisel", "cider", "circle", "citrus", "clay", "cliff", "clock", "cloud", "clover",
    "cobalt", "coconut", "comet", "copper", "coral", "cotton", "cougar", "cradle", "crane", "crater",
    "cricket", "crown", "crystal", "cube", "curtain", "cycle", "daisy", "deck", "delta", "denim",
    "desk", "dial", "diesel", "dome", "donkey", "dragon", "drum", "dune", "eagle", "easel",
    "echo", "eclipse", "edge", "elbow", "ember", "engine", "envoy", "fabric", "falcon", "feather",
    "fence", "fern", "fiddle", "fig", "flint", "flute", "fog", "forest", "fossil", "fox",
    "frame", "frost", "galaxy", "garden", "garlic", "gecko", "geyser", "ginger", "glacier", "globe",
    "glove", "goose", "granite", "grape", "gravel", "grove", "guitar", "hammer", "harbor", "hawk",
    "hazel", "helmet", "heron", "hill", "honey", "hook", "horizon", "hudson", "igloo", "iris",
    "iron", "island", "ivory", "jade", "jaguar", "jasper", "jungle", "kayak", "kettle", "kiwi",
    "knight", "koala", "ladder", "lagoon", "lantern", "lava", "lemon", "lentil", "lilac", "lily",
    "lime", "lion", "lizard", "llama", "lobster", "locket", "lotus", "lunar", "magnet", "mango",
    "maple", "marble", "mason", "meadow", "melon", "mesa", "meteor", "mint", "mirror", "monsoon",
    "moose", "mosaic", "moss", "motor", "mountain", "mural", "nectar", "nickel", "ninja", "north",
    "nova", "nugget", "oak", "oasis", "ocean", "olive", "onion", "opal", "orbit", "orchid",
    "otter", "owl", "oxen", "oyster", "palm", "panda", "paper", "parrot", "peach", "pearl",
    "pebble", "pelican", "pepper", "piano", "pine", "pistol", "planet", "plum", "pond", "poppy",
    "prairie", "prism", "pumpkin", "quartz", "quill", "rabbit", "raccoon", "radar", "raft", "rain",
    "raven", "reef", "ridge", "river", "robin", "rocket", "rose", "ruby", "saddle", "salmon",
    "sand", "sapphire", "satin", "violet", "walnut", "zebra",
];
