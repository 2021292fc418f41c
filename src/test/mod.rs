mod driver;
mod flows;
mod topology;
