pub mod coordinate;

pub mod geodesy;

pub mod flight_path;

pub mod sim_error;

pub mod listener;

pub mod path_simulator;

pub mod timer;

pub mod simulation;

pub mod airspace;

pub mod geofence;

pub mod status_board;

pub mod config;
