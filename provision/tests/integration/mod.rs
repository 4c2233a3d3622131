mod provisioner_test;
