pub(crate) mod hud;
