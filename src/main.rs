fn main() {
    prime_site::app::start();
}
