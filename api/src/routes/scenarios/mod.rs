pub mod scenarios_route;
