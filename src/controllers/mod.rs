pub mod resource_controller;
