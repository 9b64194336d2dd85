fn main() {
    vehicle_parking::run();
}
