//! Pseudo-class suffixes and responsive breakpoint prefixes.

/// Short pseudo-class keys accepted after `_` or `__` in a class token.
pub const PSEUDO_CLASSES: [(&str, &str); 20] = [
    ("act", ":active"),
    ("blr", ":blur"),
    ("chk", ":checked"),
    ("dis", ":disabled"),
    ("enb", ":enabled"),
    ("emp", ":empty"),
    ("fcs", ":focus"),
    ("fch", ":first-child"),
    ("fls", ":fullscreen"),
    ("hvr", ":hover"),
    ("inv", ":invalid"),
    ("lch", ":last-child"),
    ("lnk", ":link"),
    ("rdo", ":read-only"),
    ("rdw", ":read-write"),
    ("rqd", ":required"),
    ("opt", ":optional"),
    ("tgt", ":target"),
    ("vst", ":visited"),
    ("val", ":valid"),
];

/// A responsive bucket selected by a token prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Breakpoint {
    pub prefix: &'static str,
    pub media: &'static str,
}

pub const BREAKPOINTS: [Breakpoint; 3] = [
    Breakpoint {
        prefix: "md",
        media: "@media(max-width:1023px) and (max-height:1023px)",
    },
    Breakpoint {
        prefix: "mdl",
        media: "@media(max-width:1023px) and (max-height:1023px) and (orientation:landscape)",
    },
    Breakpoint {
        prefix: "mdp",
        media: "@media(max-width:1023px) and (max-height:1023px) and (orientation:portrait)",
    },
];

pub fn pseudo_class(key: &str) -> Option<&'static str> {
    PSEUDO_CLASSES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, selector)| *selector)
}

pub fn breakpoint(prefix: &str) -> Option<&'static Breakpoint> {
    BREAKPOINTS.iter().find(|bp| bp.prefix == prefix)
}
