use spacejam_api::SpaceshipPilot;

mod afk;
mod batman;
mod circle;
mod creeper;
mod idle;
mod orbiter;

/// What a pilot knows about the arena when it is built.
#[derive(Clone, Debug)]
pub struct PilotContext {
    pub field_size: f64,
    pub spaceship_size: f64,
    /// Energy regained at the start of every tick.
    pub energy_regen: f64,
    /// Energy per unit of scanned area.
    pub scan_cost_factor: f64,
    /// Seed for pilots that make random choices.
    pub seed: u64,
}

pub struct PilotEntry {
    pub name: &'static str,
    /// `#RRGGBB`
    pub color: &'static str,
    create: fn(&PilotContext) -> Box<dyn SpaceshipPilot>,
}

impl PilotEntry {
    pub fn create(&self, context: &PilotContext) -> Box<dyn SpaceshipPilot> {
        (self.create)(context)
    }
}

static PILOTS: &[PilotEntry] = &[
    PilotEntry {
        name: "afk",
        color: "#FFBB00",
        create: afk::create,
    },
    PilotEntry {
        name: "circle",
        color: "#2D82F0",
        create: circle::create,
    },
    PilotEntry {
        name: "orbiter",
        color: "#2DF0C8",
        create: orbiter::create,
    },
    PilotEntry {
        name: "creeper",
        color: "#1B8F1D",
        create: creeper::create,
    },
    PilotEntry {
        name: "batman",
        color: "#FFFFFF",
        create: batman::create,
    },
    PilotEntry {
        name: "explorer",
        color: "#FF4000",
        create: idle::create,
    },
    PilotEntry {
        name: "testdummy",
        color: "#808080",
        create: idle::create,
    },
];

pub fn names() -> Vec<&'static str> {
    PILOTS.iter().map(|entry| entry.name).collect()
}

pub fn load(name: &str) -> Result<&'static PilotEntry, String> {
    PILOTS
        .iter()
        .find(|entry| entry.name == name)
        .ok_or_else(|| format!("Unknown pilot {name:?}, expected one of {:?}", names()))
}
