
pub const TITLE_SCREEN: &str = "title_screen";
pub const INSTRUCTIONS: &str = "instructions";
pub const LOAD_SAVE: &str = "load_save";
pub const BROTHER_A_TRANSITION: &str = "brother_a_transition";
pub const BROTHER_B_TRANSITION: &str = "brother_b_transition";
pub const ENDING: &str = "ending";
pub const CLASSROOM: &str = "classroom";
pub const PLAYGROUND: &str = "playground";
pub const HALLWAY: &str = "hallway";
pub const STREET: &str = "street";
pub const STORE: &str = "store";
pub const COSTCO: &str = "costco";
