mod dataset;
mod toolkit;
